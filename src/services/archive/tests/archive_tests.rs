use super::*;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper: create a minimal valid ZIP.
fn create_test_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let zip_path = dir.join(name);
    let file = fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (entry_name, content) in files {
        writer.start_file(entry_name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
    zip_path
}

fn jar_entry_names(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_format_detection() {
    assert_eq!(
        ArchiveFormat::from_path(Path::new("pack.zip")),
        Some(ArchiveFormat::Zip)
    );
    assert_eq!(
        ArchiveFormat::from_path(Path::new("Pack.ZIP")),
        Some(ArchiveFormat::Zip)
    );
    assert_eq!(ArchiveFormat::from_path(Path::new("pack.7z")), None);
    assert_eq!(ArchiveFormat::from_path(Path::new("pack")), None);
}

#[test]
fn test_reader_lists_and_opens_entries() {
    let dir = TempDir::new().unwrap();
    let zip_path = create_test_zip(
        dir.path(),
        "bundle.zip",
        &[
            ("pack.mcmeta", b"{}"),
            ("data/ns/tags/x.json", b"{\"values\":[]}"),
        ],
    );

    let mut reader = ZipBundleReader::open(&zip_path).unwrap();
    let entries = reader.list_entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].path, PathBuf::from("data/ns/tags/x.json"));
    assert!(!entries[1].is_dir);
    assert_eq!(entries[1].size, 13);

    let mut content = String::new();
    reader
        .open_entry(entries[1].index)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "{\"values\":[]}");
}

#[test]
fn test_reader_skips_escaping_entries() {
    let dir = TempDir::new().unwrap();
    let zip_path = create_test_zip(
        dir.path(),
        "evil.zip",
        &[("../outside.txt", b"nope"), ("pack.mcmeta", b"{}")],
    );

    let mut reader = ZipBundleReader::open(&zip_path).unwrap();
    let entries = reader.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, PathBuf::from("pack.mcmeta"));
}

#[test]
fn test_reader_rejects_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.zip");
    fs::write(&path, b"definitely not a zip").unwrap();

    assert!(matches!(
        ZipBundleReader::open(&path),
        Err(ArchiveError::Zip { .. })
    ));
}

#[test]
fn test_reader_missing_index() {
    let dir = TempDir::new().unwrap();
    let zip_path = create_test_zip(dir.path(), "one.zip", &[("a.txt", b"a")]);
    let mut reader = ZipBundleReader::open(&zip_path).unwrap();
    assert!(matches!(
        reader.open_entry(5),
        Err(ArchiveError::MissingEntry(5))
    ));
}

#[test]
fn test_writer_publishes_on_close() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("mods").join("my_pack.jar");

    let mut writer = ZipJarWriter::create(&target).unwrap();
    writer.put_entry("fabric.mod.json", b"{}").unwrap();
    let copied = writer
        .put_entry_from("data/a.json", &mut Cursor::new(b"[1,2]".to_vec()))
        .unwrap();
    assert_eq!(copied, 5);
    assert!(writer.contains("data/a.json"));
    assert!(!target.exists(), "nothing published before close");

    let published = writer.close().unwrap();
    assert_eq!(published, target);
    assert_eq!(
        jar_entry_names(&target),
        vec!["fabric.mod.json".to_string(), "data/a.json".to_string()]
    );

    let leftovers: Vec<_> = fs::read_dir(dir.path().join("mods"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(leftovers, vec!["my_pack.jar".to_string()]);
}

#[test]
fn test_writer_drop_discards_partial_archive() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("half.jar");
    {
        let mut writer = ZipJarWriter::create(&target).unwrap();
        writer.put_entry("fabric.mod.json", b"{}").unwrap();
    }
    assert!(!target.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_writer_replaces_existing_archive() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("pack.jar");
    fs::write(&target, b"stale").unwrap();

    let mut writer = ZipJarWriter::create(&target).unwrap();
    writer.put_entry("fabric.mod.json", b"{}").unwrap();
    writer.close().unwrap();

    assert_eq!(jar_entry_names(&target), vec!["fabric.mod.json".to_string()]);
}

#[test]
fn test_writer_rejects_duplicate_entries() {
    let dir = TempDir::new().unwrap();
    let mut writer = ZipJarWriter::create(&dir.path().join("dup.jar")).unwrap();
    writer.put_entry("a.txt", b"1").unwrap();
    assert!(matches!(
        writer.put_entry("a.txt", b"2"),
        Err(ArchiveError::DuplicateEntry(_))
    ));
}
