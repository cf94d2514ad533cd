//! ELF backend.
//!
//! Implements the `SectionLocator` trait by walking the section header table
//! of an ELF image directly (32 or 64 bit, either byte order).

use object::elf::{FileHeader32, FileHeader64};
use object::read::elf::{FileHeader, SectionHeader};
use object::{Endianness, FileKind};

use super::SectionLocator;
use crate::error::{PackError, Result};
use crate::layout::SectionDescriptor;

/// An ELF image borrowed for section lookup.
pub struct ElfLocator<'data> {
    data: &'data [u8],
    kind: FileKind,
}

impl<'data> ElfLocator<'data> {
    /// Checks that `data` is an ELF image and parses its file header.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let kind = FileKind::parse(data)?;
        match kind {
            FileKind::Elf32 => {
                FileHeader32::<Endianness>::parse(data)?;
            }
            FileKind::Elf64 => {
                FileHeader64::<Endianness>::parse(data)?;
            }
            other => return Err(PackError::UnsupportedFormat(format!("{other:?}"))),
        }
        Ok(Self { data, kind })
    }

    /// Size of the underlying image in bytes.
    pub fn image_len(&self) -> u64 {
        self.data.len() as u64
    }
}

impl SectionLocator for ElfLocator<'_> {
    fn locate(&self, name: &str) -> Result<SectionDescriptor> {
        let found = match self.kind {
            FileKind::Elf32 => find_section::<FileHeader32<Endianness>>(self.data, name)?,
            _ => find_section::<FileHeader64<Endianness>>(self.data, name)?,
        };
        let (file_offset, capacity) = found.ok_or_else(|| PackError::SectionNotFound {
            name: name.to_string(),
        })?;

        let section = SectionDescriptor::new(name, file_offset, capacity);
        if !section.fits_within(self.image_len()) {
            return Err(PackError::SectionOutOfBounds {
                name: name.to_string(),
                offset: file_offset,
                capacity,
                image_len: self.image_len(),
            });
        }

        tracing::debug!(
            "Resolved section {} at 0x{:x} (capacity {})",
            name,
            file_offset,
            capacity
        );
        Ok(section)
    }
}

/// Returns `(file offset, file size)` of the first section named `name`.
///
/// `SHT_NOBITS` sections occupy no bytes in the file and report a size of 0.
fn find_section<Elf: FileHeader<Endian = Endianness>>(
    data: &[u8],
    name: &str,
) -> Result<Option<(u64, u64)>> {
    let header = Elf::parse(data)?;
    let endian = header.endian()?;
    let sections = header.sections(endian, data)?;

    for section in sections.iter() {
        let section_name = sections.section_name(endian, section)?;
        if section_name != name.as_bytes() {
            continue;
        }
        let range = section
            .file_range(endian)
            .unwrap_or((section.sh_offset(endian).into(), 0));
        return Ok(Some(range));
    }
    Ok(None)
}
