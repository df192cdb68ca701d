use crate::services::identity::normalize;
use crate::types::{PackOrigin, PackSource};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Write `pack.mcmeta` with a plain description.
pub fn write_descriptor(root: &Path, description: &str) {
    fs::create_dir_all(root).unwrap();
    let json = serde_json::json!({
        "pack": { "pack_format": 48, "description": description }
    });
    fs::write(root.join("pack.mcmeta"), json.to_string()).unwrap();
}

/// Write a file at `root/relative`, creating parents.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A raw-directory source rooted at `root`, named after its last component.
pub fn raw_source(root: &Path) -> PackSource {
    let name = root.file_name().unwrap().to_string_lossy().to_string();
    let identity = normalize(&name);
    PackSource {
        root: root.to_path_buf(),
        ledger_key: identity.to_string(),
        name,
        origin: PackOrigin::RawDirectory,
        identity,
    }
}

/// Create a zip at `path` holding `(entry name, content)` pairs.
/// Names ending in `/` become directory entries.
pub fn create_test_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// Entry names of a jar, in archive order.
pub fn jar_entries(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn read_jar_entry(path: &Path, name: &str) -> Vec<u8> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut buf = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut buf).unwrap();
    buf
}
