use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supported bundle format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
}

impl ArchiveFormat {
    /// Detect format from file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// One entry listed by an [`ArchiveReader`](super::ArchiveReader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub index: usize,
    /// Relative path inside the archive. Entries whose names would escape the
    /// extraction root are never listed.
    pub path: PathBuf,
    pub is_dir: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid or corrupt archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),
    #[error("No entry at index {0}")]
    MissingEntry(usize),
    #[error("Failed to render manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
