//! Input loading.

use memmap2::Mmap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PackError, Result};

fn classify(what: &'static str, path: &Path, err: std::io::Error) -> PackError {
    if err.kind() == ErrorKind::NotFound {
        PackError::MissingInput {
            what,
            path: path.to_path_buf(),
        }
    } else {
        PackError::io(path, err)
    }
}

/// Reads the whole payload file.
pub fn read_payload(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| classify("payload", path, e))
}

/// Maps the template executable read-only.
pub fn map_template(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|e| classify("template", path, e))?;
    // SAFETY: the mapping is read-only and the template is not expected to
    // change while a run is in progress.
    unsafe { Mmap::map(&file) }.map_err(|e| PackError::io(path, e))
}
