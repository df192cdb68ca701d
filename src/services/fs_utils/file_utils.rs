use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write a file atomically: write to a temp file next to `path`, then rename
/// over the final path. Readers always see either the old or the new content.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".pokepatcher")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Remove a directory tree if it exists. Missing directories are not an error.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Move every child of `from` into `to`. Children whose name already exists
/// in `to` are left behind and logged.
pub fn move_children(from: &Path, to: &Path) -> io::Result<usize> {
    let mut moved = 0;
    for child in fs::read_dir(from)? {
        let child = child?;
        let target = to.join(child.file_name());
        if target.exists() {
            log::warn!(
                "Skip move: {} already exists at destination",
                child.file_name().to_string_lossy()
            );
            continue;
        }
        fs::rename(child.path(), &target)?;
        moved += 1;
    }
    Ok(moved)
}
