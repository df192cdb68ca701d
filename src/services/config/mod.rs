pub mod models;

pub use models::*;

use crate::services::fs_utils::atomic_write;
use crate::types::{PackError, PackResult};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Settings file, relative to the game directory.
pub const SETTINGS_FILE: &str = "config/pokepatcher/settings.json";

pub const ENV_GAME_DIR: &str = "POKEPATCHER_GAME_DIR";
pub const ENV_WORKERS: &str = "POKEPATCHER_WORKERS";
pub const ENV_ENTRYPOINTS: &str = "POKEPATCHER_ENTRYPOINTS";
pub const ENV_JAVAC: &str = "POKEPATCHER_JAVAC";
pub const ENV_CLASSPATH: &str = "POKEPATCHER_CLASSPATH";

pub struct ConfigService {
    path: PathBuf,
    settings: Mutex<PatcherConfig>,
}

impl ConfigService {
    /// Load settings for `game_dir`: defaults, then the settings file, then
    /// environment overrides.
    pub fn load(game_dir: &Path) -> PackResult<Self> {
        Self::load_with_env(game_dir, |key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an injectable environment lookup.
    pub fn load_with_env<F>(game_dir: &Path, env: F) -> PackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = game_dir.join(SETTINGS_FILE);
        let mut settings = read_settings_file(&path)?.unwrap_or_default();
        settings.game_dir = game_dir.to_path_buf();
        apply_env_overrides(&mut settings, env)?;

        Ok(Self {
            path,
            settings: Mutex::new(settings),
        })
    }

    pub fn settings_path(&self) -> &Path {
        &self.path
    }

    pub fn get_settings(&self) -> PatcherConfig {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Persist `new_settings` atomically and make them current.
    pub fn save_settings(&self, new_settings: PatcherConfig) -> PackResult<()> {
        let json = serde_json::to_string_pretty(&new_settings)
            .map_err(|e| PackError::Config(format!("Failed to serialize settings: {e}")))?;
        atomic_write(&self.path, json.as_bytes()).map_err(|e| {
            PackError::Config(format!("Failed to write {}: {e}", self.path.display()))
        })?;

        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = new_settings;
        Ok(())
    }

    /// Write the current settings if no settings file exists yet, so users
    /// have something to edit. Returns whether a file was written.
    pub fn ensure_settings_file(&self) -> PackResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save_settings(self.get_settings())?;
        log::info!("Wrote default settings to {}", self.path.display());
        Ok(true)
    }
}

/// Read and parse the settings file. Returns `None` if it doesn't exist.
fn read_settings_file(path: &Path) -> PackResult<Option<PatcherConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PackError::Config(format!("Failed to read {}: {e}", path.display())))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    serde_json::from_str(content)
        .map(Some)
        .map_err(|e| PackError::Config(format!("Failed to parse {}: {e}", path.display())))
}

fn apply_env_overrides<F>(settings: &mut PatcherConfig, env: F) -> PackResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env(ENV_WORKERS) {
        let workers = raw
            .trim()
            .parse::<usize>()
            .map_err(|e| PackError::Config(format!("{ENV_WORKERS}={raw}: {e}")))?;
        settings.workers = (workers > 0).then_some(workers);
    }

    if let Some(raw) = env(ENV_ENTRYPOINTS) {
        settings.entrypoints.enabled = parse_flag(&raw).ok_or_else(|| {
            PackError::Config(format!("{ENV_ENTRYPOINTS}={raw}: expected a boolean"))
        })?;
    }

    if let Some(raw) = env(ENV_JAVAC) {
        if !raw.trim().is_empty() {
            settings.entrypoints.javac = Some(PathBuf::from(raw.trim()));
        }
    }

    if let Some(raw) = env(ENV_CLASSPATH) {
        settings.entrypoints.classpath = std::env::split_paths(&raw)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
    }

    Ok(())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
