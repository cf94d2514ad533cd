//! Template layout.
//!
//! This module defines the structures describing where the reserved regions
//! live inside the template image.

use std::ops::Range;

/// A named region of the template image.
///
/// A `SectionDescriptor` is a snapshot of one entry from the template's
/// section header table. It is resolved once per run and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptor {
    /// Name of the section (e.g. ".packed").
    pub name: String,
    /// Offset of the section's first byte in the file.
    pub file_offset: u64,
    /// Number of bytes the section occupies in the file.
    pub capacity: u64,
}

impl SectionDescriptor {
    pub fn new(name: &str, file_offset: u64, capacity: u64) -> Self {
        Self {
            name: name.to_string(),
            file_offset,
            capacity,
        }
    }

    /// The byte range of the first `len` bytes of this section.
    ///
    /// Callers check `len <= capacity` and that the section lies inside the
    /// image before indexing with the result.
    pub fn prefix(&self, len: usize) -> Range<usize> {
        let start = self.file_offset as usize;
        start..start + len
    }

    /// Whether the section ends at or before `image_len`.
    pub fn fits_within(&self, image_len: u64) -> bool {
        self.file_offset
            .checked_add(self.capacity)
            .is_some_and(|end| end <= image_len)
    }
}
