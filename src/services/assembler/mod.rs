//! Jar assembly: manifest, compiled classes, resource trees, icon.

use crate::services::archive::{ArchiveError, ArchiveWriter, ZipJarWriter};
use crate::services::compiler::CompiledUnit;
use crate::services::fs_utils::{archive_entry_name, class_file_path};
use crate::services::manifest::{FabricManifest, MANIFEST_ENTRY};
use crate::types::{PackError, PackResult, PackSource};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Pack icon, relative to the pack root.
pub const ICON_FILE: &str = "pack.png";

/// Output archive path for an identifier.
pub fn archive_path(output_dir: &Path, identifier: &str) -> PathBuf {
    output_dir.join(format!("{identifier}.jar"))
}

/// Write `<output_dir>/<id>.jar` for one pack and return its path.
pub fn assemble(
    source: &PackSource,
    manifest: &FabricManifest,
    compiled: Option<&CompiledUnit>,
    resource_dirs: &[String],
    output_dir: &Path,
) -> PackResult<PathBuf> {
    let target = archive_path(output_dir, &manifest.id);
    let writer = ZipJarWriter::create(&target).map_err(|e| archive_err(&target, e))?;
    write_archive(writer, source, manifest, compiled, resource_dirs)
        .map_err(|e| archive_err(&target, e))
}

/// Fill `writer` and close it. Generic so tests can assemble into any sink.
pub fn write_archive<W: ArchiveWriter>(
    mut writer: W,
    source: &PackSource,
    manifest: &FabricManifest,
    compiled: Option<&CompiledUnit>,
    resource_dirs: &[String],
) -> Result<PathBuf, ArchiveError> {
    writer.put_entry(MANIFEST_ENTRY, manifest.render()?.as_bytes())?;

    if let Some(unit) = compiled {
        for (class_name, bytes) in &unit.classes {
            writer.put_entry(&class_file_path(class_name), bytes)?;
        }
    }

    let mut copied = 0usize;
    for dir in resource_dirs {
        copied += copy_tree(&mut writer, &source.root, dir)?;
    }

    let icon = source.root.join(ICON_FILE);
    if icon.is_file() {
        if writer.contains(&manifest.icon) {
            log::warn!(
                "[{}] {} already present in resources; skipping pack icon",
                manifest.id,
                manifest.icon
            );
        } else {
            let mut file = open(&icon)?;
            writer.put_entry_from(&manifest.icon, &mut file)?;
        }
    }

    log::debug!("[{}] wrote {copied} resource file(s)", manifest.id);
    writer.close()
}

/// Copy every regular file under `root/<dir>` into the archive at `<dir>/...`.
/// Symlinks are followed. A missing subtree copies nothing.
fn copy_tree<W: ArchiveWriter>(
    writer: &mut W,
    root: &Path,
    dir: &str,
) -> Result<usize, ArchiveError> {
    let base = root.join(dir);
    if !base.is_dir() {
        return Ok(0);
    }

    let prefix = format!("{dir}/");
    let mut copied = 0;
    for entry in WalkDir::new(&base).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Io {
            path: base.clone(),
            source: e.into(),
        })?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            log::warn!("Skipping {}: not a regular file", entry.path().display());
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&base) else {
            continue;
        };
        let name = archive_entry_name(&prefix, relative);
        let mut file = open(entry.path())?;
        writer.put_entry_from(&name, &mut file)?;
        copied += 1;
    }
    Ok(copied)
}

fn open(path: &Path) -> Result<fs::File, ArchiveError> {
    fs::File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn archive_err(target: &Path, err: ArchiveError) -> PackError {
    PackError::ArchiveWrite {
        path: target.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/assembler_tests.rs"]
mod tests;
