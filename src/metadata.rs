//! Metadata record written into the template for the runtime stub.
//!
//! Layout (little-endian):
//!
//! | offset | size | field                              |
//! |--------|------|------------------------------------|
//! | 0      | 4    | payload size                       |
//! | 4      | 1    | rotation (1..=7)                   |
//! | 5      | 1    | reserved, 0                        |
//! | 6      | 2    | reserved, 0                        |
//! | 8      | 4    | checksum                           |
//! | 12     | 4    | padding, 0 (extended only)         |
//! | 16     | 8    | passphrase hash (extended only)    |

use object::endian::{LittleEndian as LE, U16, U32, U64};
use object::pod::{bytes_of, Pod};

use crate::error::{PackError, Result};
use crate::transform::Rotation;

/// Which variant of the record to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MetadataLayout {
    /// Size, rotation, checksum: 12 bytes.
    Compact,
    /// Compact record followed by an 8-byte aligned passphrase hash: 24 bytes.
    Extended,
}

impl MetadataLayout {
    pub fn size(self) -> usize {
        match self {
            MetadataLayout::Compact => std::mem::size_of::<RawCompact>(),
            MetadataLayout::Extended => std::mem::size_of::<RawExtended>(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
struct RawCompact {
    payload_size: U32<LE>,
    rotation: u8,
    reserved0: u8,
    reserved1: U16<LE>,
    checksum: U32<LE>,
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
struct RawExtended {
    compact: RawCompact,
    padding: U32<LE>,
    passphrase_hash: U64<LE>,
}

// SAFETY: both structs are `repr(C)`, contain only integer fields, and have
// no implicit padding.
unsafe impl Pod for RawCompact {}
unsafe impl Pod for RawExtended {}

/// Everything the runtime stub needs to recover the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub payload_size: u32,
    pub rotation: Rotation,
    pub checksum: u32,
    pub passphrase_hash: Option<u64>,
}

impl Metadata {
    /// The smallest layout able to hold this record.
    pub fn natural_layout(&self) -> MetadataLayout {
        if self.passphrase_hash.is_some() {
            MetadataLayout::Extended
        } else {
            MetadataLayout::Compact
        }
    }

    /// Serializes the record with `layout`.
    pub fn encode(&self, layout: MetadataLayout) -> Result<Vec<u8>> {
        let compact = RawCompact {
            payload_size: U32::new(LE, self.payload_size),
            rotation: self.rotation.get(),
            reserved0: 0,
            reserved1: U16::new(LE, 0),
            checksum: U32::new(LE, self.checksum),
        };
        match layout {
            MetadataLayout::Compact => {
                if self.passphrase_hash.is_some() {
                    return Err(PackError::PassphraseNeedsExtendedLayout);
                }
                Ok(bytes_of(&compact).to_vec())
            }
            MetadataLayout::Extended => {
                let extended = RawExtended {
                    compact,
                    padding: U32::new(LE, 0),
                    passphrase_hash: U64::new(LE, self.passphrase_hash.unwrap_or(0)),
                };
                Ok(bytes_of(&extended).to_vec())
            }
        }
    }

    /// Serializes the record, failing if it would not fit in `capacity` bytes.
    pub fn encode_within(&self, layout: MetadataLayout, capacity: u64) -> Result<Vec<u8>> {
        let size = layout.size() as u64;
        if size > capacity {
            return Err(PackError::MetadataOverflow { size, capacity });
        }
        self.encode(layout)
    }
}
