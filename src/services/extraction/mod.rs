//! Input discovery.
//!
//! Walks the datapack directory, skips whatever the ledger already knows,
//! extracts bundles into staging and hands back one [`PackSource`] per pack
//! left to build.

mod bundle;

pub use bundle::{extract_bundle, flatten_if_wrapped};

use crate::services::archive::ArchiveFormat;
use crate::services::config::models::PatcherConfig;
use crate::services::identity::{normalize, PackIdentity};
use crate::services::ledger::PatchLedger;
use crate::types::{
    PackError, PackOrigin, PackReport, PackResult, PackSource, PackStage, PackStatus,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What discovery produced.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Packs to build, in file-name order.
    pub sources: Vec<PackSource>,
    /// Candidates that were skipped or failed before packaging.
    pub reports: Vec<PackReport>,
}

/// Enumerate and prepare every pack under the configured datapack directory.
///
/// Only failing to read the directory itself is an error.
pub fn discover(config: &PatcherConfig, ledger: &PatchLedger) -> PackResult<Discovery> {
    let input = config.datapack_path();
    let staging = config.staging_path();

    fs::create_dir_all(&input).map_err(|source| PackError::Discovery {
        path: input.clone(),
        source,
    })?;

    let mut children = fs::read_dir(&input)
        .and_then(|rd| rd.collect::<Result<Vec<_>, _>>())
        .map_err(|source| PackError::Discovery {
            path: input.clone(),
            source,
        })?;
    children.sort_by_key(|entry| entry.file_name());

    let mut candidates = Vec::new();
    for child in children {
        let path = child.path();
        let name = child.file_name().to_string_lossy().to_string();

        if path.is_dir() {
            let identity = normalize(&name);
            candidates.push(Candidate {
                ledger_key: identity.to_string(),
                identity,
                name,
                path,
                bundle: false,
            });
        } else if ArchiveFormat::from_path(&path).is_some() {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            candidates.push(Candidate {
                ledger_key: name.clone(),
                identity: normalize(&stem),
                name,
                path,
                bundle: true,
            });
        } else {
            log::debug!("Ignoring {}: not a directory or bundle", path.display());
        }
    }

    let mut discovery = Discovery::default();
    let mut claimed: HashMap<PackIdentity, String> = HashMap::new();

    // Already-patched packs own their jar, so they claim first.
    let (done, pending): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| ledger.contains(&c.ledger_key));
    for candidate in done {
        log::info!("Skipping {}: already patched", candidate.name);
        claimed
            .entry(candidate.identity.clone())
            .or_insert_with(|| candidate.name.clone());
        discovery.reports.push(PackReport {
            name: candidate.name,
            identifier: Some(candidate.identity.to_string()),
            status: PackStatus::Skipped {
                reason: "already patched".to_string(),
            },
        });
    }

    for candidate in pending {
        let Candidate {
            ledger_key,
            identity,
            name,
            path,
            bundle,
        } = candidate;

        if let Some(owner) = claimed.get(&identity) {
            let error = format!("identifier '{identity}' is already taken by {owner}");
            log::error!("Rejecting {name}: {error}");
            discovery
                .reports
                .push(failed(&name, &identity, PackStage::Discovery, error));
            continue;
        }

        let (root, origin) = if bundle {
            match extract_bundle(&path, &staging) {
                Ok(root) => (root, PackOrigin::ExtractedBundle { bundle: path }),
                Err(err) => {
                    log::error!("{err}");
                    discovery
                        .reports
                        .push(failed(&name, &identity, err.stage(), err.to_string()));
                    continue;
                }
            }
        } else {
            (path, PackOrigin::RawDirectory)
        };

        claimed.insert(identity.clone(), name.clone());
        discovery.sources.push(PackSource {
            root,
            name,
            origin,
            ledger_key,
            identity,
        });
    }

    log::info!(
        "Discovered {} pack(s) in {} ({} not queued)",
        discovery.sources.len(),
        input.display(),
        discovery.reports.len()
    );
    Ok(discovery)
}

/// Remove the staging directory and everything extracted into it.
pub fn clean_staging(staging: &Path) {
    match crate::services::fs_utils::remove_dir_if_exists(staging) {
        Ok(()) => log::debug!("Removed staging directory {}", staging.display()),
        Err(e) => log::warn!("Failed to remove staging directory {}: {e}", staging.display()),
    }
}

struct Candidate {
    ledger_key: String,
    identity: PackIdentity,
    name: String,
    path: PathBuf,
    bundle: bool,
}

fn failed(name: &str, identity: &PackIdentity, stage: PackStage, error: String) -> PackReport {
    PackReport {
        name: name.to_string(),
        identifier: Some(identity.to_string()),
        status: PackStatus::Failed { stage, error },
    }
}

#[cfg(test)]
#[path = "tests/extraction_tests.rs"]
mod tests;
