use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the optional generated entrypoint class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntrypointConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Explicit `javac` binary. Looked up on `PATH` when absent.
    #[serde(default)]
    pub javac: Option<PathBuf>,
    /// Jars holding `net.fabricmc.api.ModInitializer` and `org.slf4j`.
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
    #[serde(default = "default_release")]
    pub release: String,
}

impl Default for EntrypointConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            javac: None,
            classpath: Vec::new(),
            release: default_release(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PatcherConfig {
    /// Root every relative path below is resolved against. Not persisted.
    #[serde(skip)]
    pub game_dir: PathBuf,
    #[serde(default = "default_datapack_dir")]
    pub datapack_dir: PathBuf,
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Subtrees copied into the jar, in order.
    #[serde(default = "default_resource_dirs")]
    pub resource_dirs: Vec<String>,
    /// Worker count. `None` uses the available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Delete extracted bundles once the run is over.
    #[serde(default)]
    pub clean_staging: bool,
    #[serde(default)]
    pub entrypoints: EntrypointConfig,
}

fn default_datapack_dir() -> PathBuf {
    PathBuf::from("config/pokepatcher/datapacks")
}
fn default_staging_dir() -> PathBuf {
    PathBuf::from("config/pokepatcher/temp")
}
fn default_ledger_path() -> PathBuf {
    PathBuf::from("config/pokepatcher/patches.json")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("mods")
}
fn default_resource_dirs() -> Vec<String> {
    vec!["data".to_string(), "assets".to_string()]
}
fn default_release() -> String {
    "21".to_string()
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            game_dir: PathBuf::from("."),
            datapack_dir: default_datapack_dir(),
            staging_dir: default_staging_dir(),
            ledger_path: default_ledger_path(),
            output_dir: default_output_dir(),
            resource_dirs: default_resource_dirs(),
            workers: None,
            clean_staging: false,
            entrypoints: EntrypointConfig::default(),
        }
    }
}

impl PatcherConfig {
    /// Defaults rooted at `game_dir`.
    pub fn for_game_dir(game_dir: impl Into<PathBuf>) -> Self {
        Self {
            game_dir: game_dir.into(),
            ..Default::default()
        }
    }

    fn resolve(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.game_dir.join(path)
        }
    }

    pub fn datapack_path(&self) -> PathBuf {
        self.resolve(&self.datapack_dir)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.resolve(&self.staging_dir)
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.resolve(&self.ledger_path)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn classpath(&self) -> Vec<PathBuf> {
        self.entrypoints
            .classpath
            .iter()
            .map(|p| self.resolve(p))
            .collect()
    }
}
