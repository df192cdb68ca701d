use crate::services::archive::{ArchiveReader, ZipBundleReader};
use crate::services::fs_utils::{is_path_safe, move_children, remove_dir_if_exists};
use crate::services::metadata::DESCRIPTOR_FILE;
use crate::types::{PackError, PackResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Free space kept on top of a bundle's uncompressed size.
const DISK_SPACE_MARGIN: u64 = 50 * 1024 * 1024;

/// Extract a `.zip` bundle into `<staging_dir>/<bundle stem>` and return the
/// pack root. Any previous staged copy is replaced.
pub fn extract_bundle(bundle: &Path, staging_dir: &Path) -> PackResult<PathBuf> {
    let fail = |reason: String| PackError::Extraction {
        bundle: bundle.to_path_buf(),
        reason,
    };

    let stem = bundle
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| fail("bundle has no file stem".to_string()))?;
    let dest = staging_dir.join(&stem);

    let mut reader = ZipBundleReader::open(bundle).map_err(|e| fail(e.to_string()))?;
    let entries = reader.list_entries().map_err(|e| fail(e.to_string()))?;

    fs::create_dir_all(staging_dir)
        .map_err(|e| fail(format!("Failed to create staging directory: {e}")))?;

    ensure_disk_space(staging_dir, required_space(entries.iter().map(|e| e.size)))
        .map_err(&fail)?;

    remove_dir_if_exists(&dest)
        .map_err(|e| fail(format!("Failed to clear stale copy: {e}")))?;
    fs::create_dir_all(&dest)
        .map_err(|e| fail(format!("Failed to create destination: {e}")))?;

    let extracted = (|| -> Result<usize, String> {
        let mut files = 0;
        for entry in &entries {
            if !is_path_safe(&entry.path) {
                log::warn!(
                    "Skipping unsafe entry {} in {}",
                    entry.path.display(),
                    bundle.display()
                );
                continue;
            }
            let output = dest.join(&entry.path);
            if entry.is_dir {
                fs::create_dir_all(&output).map_err(|e| format!("Failed to create dir: {e}"))?;
                continue;
            }
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).map_err(|e| format!("Failed to create parent: {e}"))?;
            }
            let mut input = reader.open_entry(entry.index).map_err(|e| e.to_string())?;
            let mut file =
                fs::File::create(&output).map_err(|e| format!("Failed to create file: {e}"))?;
            io::copy(&mut input, &mut file).map_err(|e| format!("Failed to write file: {e}"))?;
            files += 1;
        }
        Ok(files)
    })();

    let files = match extracted {
        Ok(files) => files,
        Err(reason) => {
            if let Err(e) = remove_dir_if_exists(&dest) {
                log::warn!("Failed to remove partial extraction {}: {e}", dest.display());
            }
            return Err(fail(reason));
        }
    };

    flatten_if_wrapped(&dest)
        .map_err(|e| fail(format!("Failed to flatten wrapper folder: {e}")))?;

    log::debug!(
        "Extracted {files} file(s) from {} to {}",
        bundle.display(),
        dest.display()
    );
    Ok(dest)
}

/// Bytes needed to extract entries of the given sizes, margin included.
/// Sizes come from archive headers, so the sum saturates instead of wrapping.
pub(crate) fn required_space(sizes: impl IntoIterator<Item = u64>) -> u64 {
    sizes.into_iter().fold(DISK_SPACE_MARGIN, u64::saturating_add)
}

/// Fail when the volume holding `dir` reports less than `required` bytes free.
/// Unknown volumes pass.
fn ensure_disk_space(dir: &Path, required: u64) -> Result<(), String> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let search_path = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

    let mut available_space = 0;
    let mut matched_len = 0;
    for disk in disks.list() {
        let mount = disk.mount_point();
        if search_path.starts_with(mount) {
            let mount_len = mount.as_os_str().len();
            if mount_len > matched_len {
                matched_len = mount_len;
                available_space = disk.available_space();
            }
        }
    }

    if matched_len > 0 && available_space < required {
        return Err(format!(
            "Insufficient disk space. Requires {required} bytes, \
             but only {available_space} bytes available."
        ));
    }
    Ok(())
}

/// If `root` has no descriptor but exactly one child directory does, lift
/// that directory's children into `root`. Returns whether anything moved.
pub fn flatten_if_wrapped(root: &Path) -> io::Result<bool> {
    if root.join(DESCRIPTOR_FILE).is_file() {
        return Ok(false);
    }

    let mut wrappers = Vec::new();
    for child in fs::read_dir(root)? {
        let path = child?.path();
        if path.is_dir() && path.join(DESCRIPTOR_FILE).is_file() {
            wrappers.push(path);
        }
    }

    let [wrapper] = wrappers.as_slice() else {
        return Ok(false);
    };

    let moved = move_children(wrapper, root)?;
    log::debug!("Flattened {moved} item(s) out of {}", wrapper.display());

    if fs::read_dir(wrapper).map(|mut d| d.next().is_none()).unwrap_or(false) {
        if let Err(e) = fs::remove_dir(wrapper) {
            log::debug!("Failed to remove empty wrapper {}: {e}", wrapper.display());
        }
    }
    Ok(true)
}
