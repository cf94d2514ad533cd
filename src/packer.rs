//! Packing pipeline.
//!
//! This module contains the `Packer` struct which runs one packing pass:
//! 1. Resolution: Looks up the payload and metadata regions in the template.
//! 2. Derivation: Computes size, checksum and the content-derived key.
//! 3. Encoding: Obfuscates the payload.
//! 4. Serialization: Builds the metadata record for the runtime stub.
//! 5. Patching: Overlays both onto a copy of the template.
//!
//! Every check happens before the output image exists, so a failed pass has
//! nothing to clean up.

use std::path::Path;

use crate::error::{PackError, Result};
use crate::key;
use crate::layout::SectionDescriptor;
use crate::locator::SectionLocator;
use crate::metadata::{Metadata, MetadataLayout};
use crate::patcher;
use crate::transform::{self, ObfuscationParams, Rotation};

/// Default name of the region receiving the encoded payload.
pub const PACKED_SECTION: &str = ".packed";
/// Default name of the region receiving the metadata record.
pub const META_SECTION: &str = ".packmeta";

/// A payload together with the attributes the stub checks it against.
pub struct Payload<'a> {
    pub bytes: &'a [u8],
    pub size: u32,
    pub checksum: u32,
}

impl<'a> Payload<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let size = u32::try_from(bytes.len()).map_err(|_| PackError::PayloadTooLarge {
            size: bytes.len() as u64,
            capacity: u32::MAX as u64,
        })?;
        Ok(Self {
            bytes,
            size,
            checksum: key::checksum(bytes),
        })
    }

    /// The content-derived obfuscation key.
    pub fn key(&self) -> u8 {
        key::derive_key(self.size, self.checksum)
    }
}

/// Settings for a packing pass.
pub struct PackOptions {
    pub packed_section: String,
    pub meta_section: String,
    /// Passphrase whose hash is stored for the stub to check.
    pub passphrase: Option<String>,
    /// Forces a metadata layout; otherwise the smallest fitting one is used.
    pub layout: Option<MetadataLayout>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            packed_section: PACKED_SECTION.to_string(),
            meta_section: META_SECTION.to_string(),
            passphrase: None,
            layout: None,
        }
    }
}

/// The result of a successful packing pass, not yet written to disk.
#[derive(Debug)]
pub struct PackedImage {
    pub image: Vec<u8>,
    pub params: ObfuscationParams,
    pub metadata: Metadata,
    pub packed: SectionDescriptor,
    pub meta: SectionDescriptor,
}

impl PackedImage {
    /// Persists the image as an executable file.
    pub fn write(&self, output_path: &Path) -> Result<()> {
        patcher::write_executable(output_path, &self.image)
    }
}

pub struct Packer<L: SectionLocator> {
    locator: L,
    options: PackOptions,
}

impl<L: SectionLocator> Packer<L> {
    pub fn new(locator: L, options: PackOptions) -> Self {
        Self { locator, options }
    }

    /// Packs `payload` into a copy of `template`.
    ///
    /// `template` must be the image the locator was built from.
    pub fn pack(&self, template: &[u8], payload: &[u8], rotation: Rotation) -> Result<PackedImage> {
        let packed = self.locator.locate(&self.options.packed_section)?;
        let meta = self.locator.locate(&self.options.meta_section)?;

        let payload = Payload::new(payload)?;
        if payload.size as u64 > packed.capacity {
            return Err(PackError::PayloadTooLarge {
                size: payload.size as u64,
                capacity: packed.capacity,
            });
        }

        let params = ObfuscationParams {
            key: payload.key(),
            rotation,
        };
        tracing::debug!(
            "Derived key 0x{:02x} from size {} and checksum 0x{:08x}",
            params.key,
            payload.size,
            payload.checksum
        );

        let encoded = transform::encode(payload.bytes, params);
        debug_assert_eq!(
            key::checksum(&transform::decode(&encoded, params)),
            payload.checksum
        );

        let metadata = Metadata {
            payload_size: payload.size,
            rotation,
            checksum: payload.checksum,
            passphrase_hash: self
                .options
                .passphrase
                .as_deref()
                .map(|p| key::passphrase_hash(p.as_bytes())),
        };
        let layout = self.options.layout.unwrap_or(metadata.natural_layout());
        let record = metadata.encode_within(layout, meta.capacity)?;

        let image = patcher::patch(template, &packed, &meta, &encoded, &record)?;

        Ok(PackedImage {
            image,
            params,
            metadata,
            packed,
            meta,
        })
    }
}
