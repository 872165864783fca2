//! Packaging of batch-export rasters into one downloadable zip archive.
//!
//! Entries are stored uncompressed: PNG payloads are already deflated.

#[cfg(test)]
#[path = "archive_test.rs"]
mod archive_test;

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::ErrorCode;
use crate::export::Raster;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),
    #[error("zip write failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("archive io failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorCode for ArchiveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEntry(_) => "E_ARCHIVE_DUPLICATE_ENTRY",
            Self::Zip(_) | Self::Io(_) => "E_ARCHIVE_WRITE",
        }
    }
}

/// A finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Suggested download name, e.g. `poster.zip`.
    pub file_name: String,
    /// Entry names in insertion order.
    pub entries: Vec<String>,
    /// Encoded zip bytes.
    pub bytes: Vec<u8>,
}

/// Write every raster into a zip archive named `file_name`, in order.
///
/// # Errors
///
/// Returns `DuplicateEntry` if two rasters share a name, or a write error
/// from the zip encoder.
pub fn pack(file_name: impl Into<String>, rasters: &[Raster]) -> Result<Archive, ArchiveError> {
    let mut seen = HashSet::with_capacity(rasters.len());
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for raster in rasters {
        if !seen.insert(raster.name.as_str()) {
            return Err(ArchiveError::DuplicateEntry(raster.name.clone()));
        }
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file(raster.name.as_str(), options)?;
        writer.write_all(&raster.bytes)?;
    }

    let bytes = writer.finish()?.into_inner();
    Ok(Archive {
        file_name: file_name.into(),
        entries: rasters.iter().map(|r| r.name.clone()).collect(),
        bytes,
    })
}
