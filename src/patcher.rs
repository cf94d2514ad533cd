//! Template patcher.
//!
//! This module overlays the encoded payload and the metadata record onto a
//! copy of the template image and writes the result to disk.

use std::fs::Permissions;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::{PackError, Result};
use crate::layout::SectionDescriptor;

/// Mode of the output artifact: executable by owner, group and others.
pub const OUTPUT_MODE: u32 = 0o755;

fn check_window(section: &SectionDescriptor, image_len: usize) -> Result<()> {
    if section.fits_within(image_len as u64) {
        Ok(())
    } else {
        Err(PackError::SectionOutOfBounds {
            name: section.name.clone(),
            offset: section.file_offset,
            capacity: section.capacity,
            image_len: image_len as u64,
        })
    }
}

/// Returns a copy of `template` with `payload` written at the start of the
/// `packed` window and `metadata` at the start of the `meta` window.
///
/// Bytes of either window past the written prefix keep their template
/// contents. Nothing is copied unless every check passes.
pub fn patch(
    template: &[u8],
    packed: &SectionDescriptor,
    meta: &SectionDescriptor,
    payload: &[u8],
    metadata: &[u8],
) -> Result<Vec<u8>> {
    check_window(packed, template.len())?;
    check_window(meta, template.len())?;

    if payload.len() as u64 > packed.capacity {
        return Err(PackError::PayloadTooLarge {
            size: payload.len() as u64,
            capacity: packed.capacity,
        });
    }
    if metadata.len() as u64 > meta.capacity {
        return Err(PackError::MetadataTooLarge {
            size: metadata.len() as u64,
            capacity: meta.capacity,
        });
    }

    let mut image = template.to_vec();
    image[packed.prefix(payload.len())].copy_from_slice(payload);
    image[meta.prefix(metadata.len())].copy_from_slice(metadata);

    tracing::debug!(
        "Patched {} bytes into {} and {} bytes into {}",
        payload.len(),
        packed.name,
        metadata.len(),
        meta.name
    );
    Ok(image)
}

/// Writes `image` to `output_path` and marks it executable.
///
/// The image goes to a temporary file next to the destination first and is
/// renamed into place once it is complete and permissioned.
pub fn write_executable(output_path: &Path, image: &[u8]) -> Result<()> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| PackError::io(dir, e))?;
    file.write_all(image)
        .map_err(|e| PackError::io(file.path(), e))?;
    file.as_file()
        .set_permissions(Permissions::from_mode(OUTPUT_MODE))
        .map_err(|e| PackError::io(file.path(), e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| PackError::io(file.path(), e))?;
    file.persist(output_path)
        .map_err(|e| PackError::io(output_path, e.error))?;

    Ok(())
}
