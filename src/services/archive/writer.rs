use super::types::ArchiveError;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;

/// Write side of the archive container.
pub trait ArchiveWriter {
    /// Add a file entry holding `bytes`.
    fn put_entry(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError>;

    /// Add a file entry streamed from `reader`. Returns the number of bytes copied.
    fn put_entry_from(&mut self, path: &str, reader: &mut dyn Read) -> Result<u64, ArchiveError>;

    /// Whether an entry with this exact name was already written.
    fn contains(&self, path: &str) -> bool;

    /// Finish the archive and publish it. Returns the published path.
    ///
    /// Dropping a writer without closing it discards everything written.
    fn close(self) -> Result<PathBuf, ArchiveError>
    where
        Self: Sized;
}

/// Zip writer that stages into a temp file beside the target and renames it
/// into place on [`close`](ArchiveWriter::close).
pub struct ZipJarWriter {
    target: PathBuf,
    zip: zip::ZipWriter<NamedTempFile>,
    written: HashSet<String>,
    options: SimpleFileOptions,
}

impl ZipJarWriter {
    pub fn create(target: &Path) -> Result<Self, ArchiveError> {
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|source| ArchiveError::Io {
            path: parent.clone(),
            source,
        })?;

        let stem = target
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "archive".to_string());

        let tmp = tempfile::Builder::new()
            .prefix(&format!(".{stem}."))
            .suffix(".tmp")
            .tempfile_in(&parent)
            .map_err(|source| ArchiveError::Io {
                path: parent.clone(),
                source,
            })?;

        Ok(Self {
            target: target.to_path_buf(),
            zip: zip::ZipWriter::new(tmp),
            written: HashSet::new(),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated)
                .unix_permissions(0o644),
        })
    }

    fn start(&mut self, path: &str) -> Result<(), ArchiveError> {
        if !self.written.insert(path.to_string()) {
            return Err(ArchiveError::DuplicateEntry(path.to_string()));
        }
        self.zip
            .start_file(path, self.options)
            .map_err(|source| ArchiveError::Zip {
                path: self.target.clone(),
                source,
            })
    }

    fn io_err(&self, source: io::Error) -> ArchiveError {
        ArchiveError::Io {
            path: self.target.clone(),
            source,
        }
    }
}

impl ArchiveWriter for ZipJarWriter {
    fn put_entry(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.start(path)?;
        self.zip.write_all(bytes).map_err(|e| self.io_err(e))
    }

    fn put_entry_from(&mut self, path: &str, reader: &mut dyn Read) -> Result<u64, ArchiveError> {
        self.start(path)?;
        io::copy(reader, &mut self.zip).map_err(|e| self.io_err(e))
    }

    fn contains(&self, path: &str) -> bool {
        self.written.contains(path)
    }

    fn close(self) -> Result<PathBuf, ArchiveError> {
        let target = self.target;
        let tmp = self.zip.finish().map_err(|source| ArchiveError::Zip {
            path: target.clone(),
            source,
        })?;
        tmp.as_file().sync_all().map_err(|source| ArchiveError::Io {
            path: target.clone(),
            source,
        })?;
        tmp.persist(&target).map_err(|e| ArchiveError::Io {
            path: target.clone(),
            source: e.error,
        })?;
        Ok(target)
    }
}
