//! Patch ledger: the persisted record of datapacks already packaged.
//!
//! Stored as a sorted JSON array of strings. Loaded once per run, mutated in
//! memory, and rewritten in full at the end of the run.

use crate::services::fs_utils::atomic_write;
use crate::types::{PackError, PackResult};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PatchLedger {
    path: PathBuf,
    entries: BTreeSet<String>,
}

impl PatchLedger {
    /// Empty ledger bound to `path`. Nothing is read.
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: BTreeSet::new(),
        }
    }

    /// Read the ledger at `path`. A missing file is an empty ledger.
    pub fn load(path: &Path) -> PackResult<Self> {
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let content = fs::read_to_string(path).map_err(|e| PackError::LedgerIo {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let keys: Vec<String> = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content).map_err(|e| PackError::LedgerIo {
                path: path.to_path_buf(),
                reason: format!("expected a JSON array of strings: {e}"),
            })?
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: keys.into_iter().collect(),
        })
    }

    /// Overwrite the ledger file with the full current set.
    pub fn save(&self) -> PackResult<()> {
        let keys: Vec<&String> = self.entries.iter().collect();
        let json = serde_json::to_string_pretty(&keys).map_err(|e| PackError::LedgerIo {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        atomic_write(&self.path, json.as_bytes()).map_err(|e| PackError::LedgerIo {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Record a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.entries.insert(key.into())
    }

    /// Merge keys collected by workers. Returns how many were new.
    pub fn extend<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        keys.into_iter().filter(|k| self.insert(k.clone())).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "tests/ledger_tests.rs"]
mod tests;
