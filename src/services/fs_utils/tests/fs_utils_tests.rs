use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_atomic_write_creates_and_overwrites() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("patches.json");

    atomic_write(&path, b"[\"a\"]").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[\"a\"]");

    atomic_write(&path, b"[]").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");

    // No temp files left behind
    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_remove_dir_if_exists_missing_is_ok() {
    let tmp = TempDir::new().unwrap();
    assert!(remove_dir_if_exists(&tmp.path().join("nope")).is_ok());

    let dir = tmp.path().join("stage");
    fs::create_dir_all(dir.join("inner")).unwrap();
    remove_dir_if_exists(&dir).unwrap();
    assert!(!dir.exists());
}

#[test]
fn test_move_children_skips_existing() {
    let tmp = TempDir::new().unwrap();
    let from = tmp.path().join("wrapper");
    fs::create_dir_all(from.join("data")).unwrap();
    fs::write(from.join("pack.mcmeta"), "{}").unwrap();
    fs::write(from.join("clash.txt"), "new").unwrap();
    fs::write(tmp.path().join("clash.txt"), "old").unwrap();

    let moved = move_children(&from, tmp.path()).unwrap();
    assert_eq!(moved, 2);
    assert!(tmp.path().join("data").is_dir());
    assert!(tmp.path().join("pack.mcmeta").is_file());
    assert_eq!(fs::read_to_string(tmp.path().join("clash.txt")).unwrap(), "old");
    assert!(from.join("clash.txt").exists());
}

#[test]
fn test_is_path_safe() {
    assert!(is_path_safe(Path::new("data/foo/bar.json")));
    assert!(is_path_safe(Path::new("./data/../assets/x.png")));
    assert!(!is_path_safe(Path::new("../escape.txt")));
    assert!(!is_path_safe(Path::new("data/../../escape.txt")));
    assert!(!is_path_safe(Path::new("/etc/passwd")));
}

#[test]
fn test_archive_entry_name_uses_forward_slashes() {
    let rel = Path::new("foo").join("bar.json");
    assert_eq!(archive_entry_name("data/", &rel), "data/foo/bar.json");
    assert_eq!(archive_entry_name("", &rel), "foo/bar.json");
    assert_eq!(archive_entry_name("assets", Path::new("x.png")), "assets/x.png");
}

#[test]
fn test_class_file_path() {
    assert_eq!(
        class_file_path("pokepatcher.generated.Datapack_my_pack__"),
        "pokepatcher/generated/Datapack_my_pack__.class"
    );
    assert_eq!(class_file_path("a.B$1"), "a/B$1.class");
}
