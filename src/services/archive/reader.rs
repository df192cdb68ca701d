use super::types::{ArchiveEntry, ArchiveError};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Read side of the archive container.
pub trait ArchiveReader {
    /// List every entry with a safe relative path, in archive order.
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>, ArchiveError>;

    /// Stream the bytes of the entry at `index`.
    fn open_entry(&mut self, index: usize) -> Result<Box<dyn Read + '_>, ArchiveError>;
}

/// Zip-backed reader for `.zip` datapack bundles.
pub struct ZipBundleReader {
    path: PathBuf,
    archive: zip::ZipArchive<BufReader<fs::File>>,
}

impl ZipBundleReader {
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = fs::File::open(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let archive =
            zip::ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Zip {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }
}

impl ArchiveReader for ZipBundleReader {
    fn list_entries(&mut self) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let entry = self
                .archive
                .by_index(index)
                .map_err(|source| ArchiveError::Zip {
                    path: self.path.clone(),
                    source,
                })?;

            let Some(path) = entry.enclosed_name() else {
                log::warn!(
                    "Skipping unsafe entry '{}' in {}",
                    entry.name(),
                    self.path.display()
                );
                continue;
            };

            entries.push(ArchiveEntry {
                index,
                path,
                is_dir: entry.is_dir(),
                size: entry.size(),
            });
        }
        Ok(entries)
    }

    fn open_entry(&mut self, index: usize) -> Result<Box<dyn Read + '_>, ArchiveError> {
        if index >= self.archive.len() {
            return Err(ArchiveError::MissingEntry(index));
        }
        let path = self.path.clone();
        let entry = self
            .archive
            .by_index(index)
            .map_err(|source| ArchiveError::Zip { path, source })?;
        Ok(Box::new(entry))
    }
}
