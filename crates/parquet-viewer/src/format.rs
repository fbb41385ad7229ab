//! Columnar file format detection.
//!
//! Leading magic bytes win over the file extension, so a Parquet file named
//! `data.arrow` is still read as Parquet. The extension is only consulted
//! when the magic is not recognized.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, ViewerError};

const PARQUET_MAGIC: &[u8] = b"PAR1";
const ARROW_FILE_MAGIC: &[u8] = b"ARROW1";
const ARROW_CONTINUATION: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Apache Parquet.
    Parquet,
    /// Arrow IPC file format (random access, also Feather v2).
    ArrowFile,
    /// Arrow IPC streaming format.
    ArrowStream,
}

impl FileFormat {
    /// Detect the format of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file cannot be opened or read, and
    /// [`ViewerError::UnrecognizedFormat`] if neither magic nor extension match.
    pub fn detect(path: &Path) -> Result<Self> {
        let mut head = Vec::with_capacity(8);
        File::open(path)?.take(8).read_to_end(&mut head)?;

        Self::from_magic(&head)
            .or_else(|| Self::from_extension(path))
            .ok_or_else(|| ViewerError::UnrecognizedFormat(path.display().to_string()))
    }

    /// Classify by leading bytes.
    #[must_use]
    pub fn from_magic(head: &[u8]) -> Option<Self> {
        if head.starts_with(PARQUET_MAGIC) {
            Some(Self::Parquet)
        } else if head.starts_with(ARROW_FILE_MAGIC) {
            Some(Self::ArrowFile)
        } else if head.starts_with(ARROW_CONTINUATION) {
            Some(Self::ArrowStream)
        } else {
            None
        }
    }

    /// Classify by extension, case-insensitively.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "parquet" | "pq" => Some(Self::Parquet),
            "arrow" | "feather" | "ipc" => Some(Self::ArrowFile),
            "arrows" => Some(Self::ArrowStream),
            _ => None,
        }
    }

    /// Short human-readable name, used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::ArrowFile => "arrow-file",
            Self::ArrowStream => "arrow-stream",
        }
    }
}
