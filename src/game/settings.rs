use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::grid_engine::DEFAULT_GRID_SIZE;
use crate::model::{MAX_GRID_SIZE, MIN_GRID_SIZE};

const CURRENT_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default = "default_grid_size")]
    pub grid_size: usize,

    /// Fixed spawn seed; `None` plays with system randomness
    #[serde(default)]
    pub seed: Option<u32>,

    #[serde(default = "default_max_autoplay_moves")]
    pub max_autoplay_moves: u32,
}

// Helper functions for default values
fn default_version() -> u32 {
    CURRENT_VERSION
}
fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}
fn default_max_autoplay_moves() -> u32 {
    5000
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: CURRENT_VERSION,
            grid_size: DEFAULT_GRID_SIZE,
            seed: None,
            max_autoplay_moves: default_max_autoplay_moves(),
        }
    }
}

/// Where settings, stats and unlocked achievements live
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tilemerge")
}

impl Settings {
    /// Reads `settings.json` from `dir`, writing defaults if it is missing or unreadable
    pub fn load_from(dir: &Path) -> Self {
        let path = Self::settings_path(dir);
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Ok(mut settings) = serde_json::from_str::<Settings>(&contents) {
                settings.migrate();
                return settings;
            }
        }
        let default = Settings::default();
        if let Err(err) = default.save_to(dir) {
            warn!(target: "settings", "Could not write default settings to {:?}: {}", path, err);
        }
        default
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), std::io::Error> {
        fs::create_dir_all(dir)?;
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(Self::settings_path(dir), contents)
    }

    fn settings_path(dir: &Path) -> PathBuf {
        dir.join("settings.json")
    }

    fn migrate(&mut self) {
        // version 1 allowed sizes outside the supported range
        if self.version < 2 {
            if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
                self.grid_size = DEFAULT_GRID_SIZE;
            }
            self.version = 2;
        }
    }

    /// Applies `SEED` and `GRID_SIZE` from the environment, ignoring bad values
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = Self::seed_from_env() {
            self.seed = Some(seed);
        }
        if let Ok(raw) = std::env::var("GRID_SIZE") {
            match raw.parse::<usize>() {
                Ok(size) if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) => {
                    self.grid_size = size
                }
                _ => warn!(target: "settings", "Ignoring GRID_SIZE={:?}", raw),
            }
        }
        self
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u32> {
        let raw = std::env::var("SEED").ok()?;
        match raw.parse::<u32>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!(target: "settings", "Ignoring SEED={:?}", raw);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path());
        assert_eq!(settings, Settings::default());
        assert!(dir.path().join("settings.json").exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), r#"{"seed": 42}"#).unwrap();
        let settings = Settings::load_from(dir.path());
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(settings.max_autoplay_moves, 5000);
    }

    #[test]
    fn test_migrates_out_of_range_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("settings.json"),
            r#"{"version": 1, "grid_size": 12}"#,
        )
        .unwrap();
        let settings = Settings::load_from(dir.path());
        assert_eq!(settings.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(settings.version, CURRENT_VERSION);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            grid_size: 6,
            seed: Some(7),
            ..Default::default()
        };
        settings.save_to(dir.path()).unwrap();
        assert_eq!(Settings::load_from(dir.path()), settings);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("SEED", "99");
        std::env::set_var("GRID_SIZE", "5");
        let settings = Settings::default().with_env_overrides();
        assert_eq!(settings.seed, Some(99));
        assert_eq!(settings.grid_size, 5);

        std::env::set_var("SEED", "not-a-number");
        std::env::set_var("GRID_SIZE", "42");
        let settings = Settings::default().with_env_overrides();
        assert_eq!(settings.seed, None);
        assert_eq!(settings.grid_size, DEFAULT_GRID_SIZE);

        std::env::remove_var("SEED");
        std::env::remove_var("GRID_SIZE");
    }
}
