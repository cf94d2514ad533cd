//! Error types.
//!
//! Every variant is fatal for a packing run. All of them are raised before the
//! output file is created, so a failed run never leaves a partial artifact.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while packing a payload into a template.
#[derive(Debug, Error)]
pub enum PackError {
    /// The payload or template file does not exist.
    #[error("{what} not found: {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    /// Reading an input or writing the output failed for a reason other than absence.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template has no section with the requested name.
    #[error("section {name} not found in template")]
    SectionNotFound { name: String },

    /// The template's header or section table could not be parsed.
    #[error("malformed template: {0}")]
    StructuralParse(#[from] object::read::Error),

    /// The template is not an ELF image.
    #[error("unsupported template format: {0}")]
    UnsupportedFormat(String),

    /// A section's file range lies (partly) outside the template image.
    #[error(
        "section {name} at 0x{offset:x} (+0x{capacity:x}) extends past end of image (0x{image_len:x} bytes)"
    )]
    SectionOutOfBounds {
        name: String,
        offset: u64,
        capacity: u64,
        image_len: u64,
    },

    /// The encoded payload does not fit in the payload region.
    #[error("payload ({size} bytes) does not fit in payload region ({capacity} bytes)")]
    PayloadTooLarge { size: u64, capacity: u64 },

    /// The serialized metadata record does not fit the metadata region.
    #[error("metadata region too small ({capacity} bytes), need {size} bytes")]
    MetadataOverflow { size: u64, capacity: u64 },

    /// The metadata bytes handed to the patcher exceed the metadata window.
    #[error("metadata ({size} bytes) does not fit in metadata window ({capacity} bytes)")]
    MetadataTooLarge { size: u64, capacity: u64 },

    /// Rotation outside 1..=7.
    #[error("rotation must be in 1..=7, got {0}")]
    InvalidRotation(u8),

    /// A passphrase hash was requested with the compact metadata layout.
    #[error("a passphrase requires the extended metadata layout")]
    PassphraseNeedsExtendedLayout,
}

impl PackError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PackError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
