use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Game directory layout used by the integration tests.
pub struct GameDir {
    pub root: tempfile::TempDir,
}

impl GameDir {
    pub fn new() -> Self {
        init_logger();
        Self {
            root: tempfile::tempdir().expect("temp dir should be created"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn datapacks(&self) -> PathBuf {
        self.path().join("config/pokepatcher/datapacks")
    }

    pub fn mods(&self) -> PathBuf {
        self.path().join("mods")
    }

    pub fn ledger(&self) -> PathBuf {
        self.path().join("config/pokepatcher/patches.json")
    }

    /// Write `relative` under the datapack directory.
    pub fn write(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.datapacks().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_zip(&self, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
        fs::create_dir_all(self.datapacks()).unwrap();
        let zip_path = self.datapacks().join(name);
        let file = fs::File::create(&zip_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (entry_name, content) in files {
            writer.start_file(entry_name.to_string(), options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
        zip_path
    }

    pub fn ledger_keys(&self) -> Vec<String> {
        let content = fs::read_to_string(self.ledger()).expect("ledger should exist");
        serde_json::from_str(&content).expect("ledger should be a JSON array")
    }

    pub fn jars(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.mods()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

pub fn jar_entries(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn read_entry(path: &Path, name: &str) -> String {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut buf = String::new();
    std::io::Read::read_to_string(&mut entry, &mut buf).unwrap();
    buf
}
