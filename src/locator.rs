//! Section lookup abstraction.
//!
//! This module defines the `SectionLocator` trait, the capability the packer
//! uses to turn a section name into a file window. Keeping the lookup behind a
//! trait lets the packing pipeline stay independent of the executable format;
//! the ELF backend lives in `locator::elf`.

use crate::error::Result;
use crate::layout::SectionDescriptor;

pub mod elf;

/// Resolves named regions of an executable image.
pub trait SectionLocator {
    /// Returns the first section called `name`.
    ///
    /// Fails with `PackError::SectionNotFound` if there is none.
    fn locate(&self, name: &str) -> Result<SectionDescriptor>;
}
