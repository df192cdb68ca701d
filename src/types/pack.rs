use crate::services::identity::PackIdentity;
use serde::Serialize;
use std::path::PathBuf;

use super::errors::PackStage;

/// Where a pack root came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PackOrigin {
    RawDirectory,
    ExtractedBundle { bundle: PathBuf },
}

/// One datapack root ready for packaging.
#[derive(Debug, Clone)]
pub struct PackSource {
    /// Directory holding `pack.mcmeta`, `data/`, `assets/`.
    pub root: PathBuf,
    /// File name of the directory or bundle as found in the input folder.
    pub name: String,
    pub origin: PackOrigin,
    /// Key recorded in the patch ledger once this pack is packaged.
    pub ledger_key: String,
    pub identity: PackIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetadataOrigin {
    Descriptor,
    Defaulted,
}

/// Descriptive fields pulled from `pack.mcmeta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackMetadata {
    /// Raw, unescaped description text.
    pub description: String,
    pub origin: MetadataOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PackStatus {
    Packaged { archive: PathBuf },
    Skipped { reason: String },
    Failed { stage: PackStage, error: String },
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackReport {
    pub name: String,
    pub identifier: Option<String>,
    pub status: PackStatus,
}

/// Result of one `package_datapacks` run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub reports: Vec<PackReport>,
    pub packaged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// `false` when the ledger could not be read or written; the next run will
    /// not know what this one packaged.
    pub ledger_durable: bool,
}

impl RunSummary {
    pub fn from_reports(reports: Vec<PackReport>, ledger_durable: bool) -> Self {
        let mut summary = Self {
            ledger_durable,
            ..Default::default()
        };
        for report in &reports {
            match report.status {
                PackStatus::Packaged { .. } => summary.packaged += 1,
                PackStatus::Skipped { .. } => summary.skipped += 1,
                PackStatus::Failed { .. } => summary.failed += 1,
                PackStatus::Cancelled => summary.cancelled += 1,
            }
        }
        summary.reports = reports;
        summary
    }

    pub fn report_for(&self, name: &str) -> Option<&PackReport> {
        self.reports.iter().find(|r| r.name == name)
    }
}
