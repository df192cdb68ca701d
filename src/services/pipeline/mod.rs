//! One packaging run, from discovery to ledger.

use crate::services::assembler::assemble;
use crate::services::compiler::{build_entrypoint, CompilerService};
use crate::services::config::models::PatcherConfig;
use crate::services::extraction::{clean_staging, discover};
use crate::services::ledger::PatchLedger;
use crate::services::manifest::FabricManifest;
use crate::services::metadata::resolve_metadata;
use crate::types::{PackError, PackReport, PackResult, PackSource, PackStatus, RunSummary};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Package every new datapack under the configured input directory.
///
/// Per-pack failures end up in the summary. Only fatal errors (unreadable
/// input directory, missing compiler while entrypoints are on) return `Err`.
/// A fatal error raised by a job stops the remaining jobs; packs that already
/// finished are still recorded in the ledger before the error is returned.
pub fn package_datapacks(
    config: &PatcherConfig,
    compiler: &dyn CompilerService,
    cancel: &AtomicBool,
) -> PackResult<RunSummary> {
    let ledger_path = config.ledger_file();
    let mut ledger_readable = true;
    let mut ledger = match PatchLedger::load(&ledger_path) {
        Ok(ledger) => {
            if ledger.is_empty() {
                log::debug!("No patched datapacks recorded in {}", ledger.path().display());
            } else {
                log::debug!(
                    "Loaded ledger {} ({} key(s))",
                    ledger.path().display(),
                    ledger.len()
                );
            }
            ledger
        }
        Err(err) => {
            log::error!("{err}; continuing with an empty ledger");
            ledger_readable = false;
            PatchLedger::empty(&ledger_path)
        }
    };

    if config.entrypoints.enabled {
        compiler
            .availability()
            .map_err(PackError::CompilerUnavailable)?;
        log::info!("Entrypoint compilation enabled ({})", compiler.name());
    }

    let discovery = discover(config, &ledger)?;
    let mut reports = discovery.reports;

    let control = RunControl::new(cancel);
    let outcomes = run_jobs(&discovery.sources, config, compiler, &control);

    let mut completed = Vec::new();
    for (report, key) in outcomes {
        completed.extend(key);
        reports.push(report);
    }

    let mut ledger_durable = ledger_readable;
    let added = ledger.extend(completed);
    if added > 0 {
        if ledger_readable {
            if let Err(err) = ledger.save() {
                log::error!("{err}; packaged datapacks will be rebuilt next run");
                ledger_durable = false;
            }
        } else {
            log::error!(
                "Not overwriting unreadable ledger {}; {added} new key(s) were not recorded",
                ledger.path().display()
            );
        }
    }

    if config.clean_staging {
        clean_staging(&config.staging_path());
    }

    reports.sort_by(|a, b| a.name.cmp(&b.name));
    for report in &reports {
        log_report(report);
    }

    let summary = RunSummary::from_reports(reports, ledger_durable);
    log::info!(
        "Packaged {}, skipped {}, failed {}, cancelled {}",
        summary.packaged,
        summary.skipped,
        summary.failed,
        summary.cancelled
    );

    match control.into_fatal() {
        Some(err) => Err(err),
        None => Ok(summary),
    }
}

/// Stop state shared by the jobs of one run.
struct RunControl<'a> {
    cancel: &'a AtomicBool,
    halted: AtomicBool,
    fatal: Mutex<Option<PackError>>,
}

impl<'a> RunControl<'a> {
    fn new(cancel: &'a AtomicBool) -> Self {
        Self {
            cancel,
            halted: AtomicBool::new(false),
            fatal: Mutex::new(None),
        }
    }

    fn should_stop(&self) -> bool {
        self.cancel.load(Ordering::Relaxed) || self.halted.load(Ordering::SeqCst)
    }

    /// Record the first fatal error and stop scheduling.
    fn halt(&self, err: PackError) {
        let mut slot = self.fatal.lock().unwrap_or_else(|p| p.into_inner());
        if slot.is_none() {
            *slot = Some(err);
        }
        self.halted.store(true, Ordering::SeqCst);
    }

    fn into_fatal(self) -> Option<PackError> {
        self.fatal.into_inner().unwrap_or_else(|p| p.into_inner())
    }
}

/// Number of pool threads for `jobs` jobs.
pub fn worker_count(configured: Option<usize>, jobs: usize) -> usize {
    let wanted = configured.filter(|n| *n > 0).unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    wanted.min(jobs).max(1)
}

fn run_jobs(
    sources: &[PackSource],
    config: &PatcherConfig,
    compiler: &dyn CompilerService,
    control: &RunControl,
) -> Vec<(PackReport, Option<String>)> {
    if sources.is_empty() {
        return Vec::new();
    }

    let threads = worker_count(config.workers, sources.len());
    let run = || {
        sources
            .par_iter()
            .map(|source| run_job(source, config, compiler, control))
            .collect::<Vec<_>>()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("pokepatcher-{i}"))
        .build()
    {
        Ok(pool) => {
            log::debug!("Packaging {} pack(s) on {threads} worker(s)", sources.len());
            pool.install(run)
        }
        Err(e) => {
            log::warn!("Failed to build worker pool ({e}); using the global pool");
            run()
        }
    }
}

fn run_job(
    source: &PackSource,
    config: &PatcherConfig,
    compiler: &dyn CompilerService,
    control: &RunControl,
) -> (PackReport, Option<String>) {
    let identifier = Some(source.identity.to_string());

    if control.should_stop() {
        let report = PackReport {
            name: source.name.clone(),
            identifier,
            status: PackStatus::Cancelled,
        };
        return (report, None);
    }

    match build_pack(source, config, compiler) {
        Ok(archive) => {
            let report = PackReport {
                name: source.name.clone(),
                identifier,
                status: PackStatus::Packaged { archive },
            };
            (report, Some(source.ledger_key.clone()))
        }
        Err(err) => {
            let report = PackReport {
                name: source.name.clone(),
                identifier,
                status: PackStatus::Failed {
                    stage: err.stage(),
                    error: err.to_string(),
                },
            };
            if err.is_fatal() {
                log::error!("{err}; stopping remaining packs");
                control.halt(err);
            }
            (report, None)
        }
    }
}

fn build_pack(
    source: &PackSource,
    config: &PatcherConfig,
    compiler: &dyn CompilerService,
) -> PackResult<PathBuf> {
    let identity = &source.identity;
    if !identity.starts_with_letter() {
        log::warn!("[{identity}] identifier does not start with a letter; Fabric may reject it");
    }

    let metadata = resolve_metadata(source)?;

    let compiled = if config.entrypoints.enabled {
        Some(build_entrypoint(compiler, identity)?)
    } else {
        None
    };

    let manifest = FabricManifest::generate(
        identity,
        &metadata,
        compiled.as_ref().map(|unit| unit.entrypoint.as_str()),
    );

    assemble(
        source,
        &manifest,
        compiled.as_ref(),
        &config.resource_dirs,
        &config.output_path(),
    )
}

fn log_report(report: &PackReport) {
    match report.status {
        PackStatus::Packaged { ref archive } => {
            log::info!("Packaged {} -> {}", report.name, archive.display())
        }
        PackStatus::Skipped { ref reason } => log::debug!("Skipped {}: {reason}", report.name),
        PackStatus::Failed { stage, ref error } => {
            log::error!("Failed {} during {stage}: {error}", report.name)
        }
        PackStatus::Cancelled => log::warn!("Cancelled {}", report.name),
    }
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
