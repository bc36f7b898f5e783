// src/core/settings.rs
//
// User-level application settings, persisted as JSON under the home
// directory. The store is a plain value handed to whoever needs it; callers
// own their instance instead of reaching for a global.

use crate::core::paths::{self, PathError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted settings. Unknown keys in the file are ignored and missing keys
/// fall back to their defaults, so old and new files both load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Build verbosity: 0 silent, 1 `-v`, 2 `-vv`.
    pub verbose_build: u8,
    pub toast_position: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose_build: 1,
            toast_position: "TOP_RIGHT".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Opens the store at the conventional location, creating the settings
    /// directory if needed.
    pub fn open_default() -> Result<Self, PathError> {
        Ok(Self::open(paths::settings_file_path()?))
    }

    /// Opens the store backed by `path`. A missing or unreadable file yields
    /// defaults; a corrupt file is logged and also yields defaults, so the
    /// application never refuses to start over settings.
    pub fn open(path: PathBuf) -> Self {
        let settings = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!(
                        "Settings file '{}' is not valid JSON ({}), using defaults.",
                        path.display(),
                        e
                    );
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        };
        SettingsStore { path, settings }
    }

    pub fn verbose_build(&self) -> u8 {
        self.settings.verbose_build
    }

    pub fn set_verbose_build(&mut self, level: u8) {
        self.settings.verbose_build = level.min(2);
        self.save();
    }

    pub fn toast_position(&self) -> &str {
        &self.settings.toast_position
    }

    pub fn set_toast_position(&mut self, position: impl Into<String>) {
        self.settings.toast_position = position.into();
        self.save();
    }

    pub fn reset_to_defaults(&mut self) {
        self.settings = Settings::default();
        self.save();
    }

    /// Writes the current settings to disk. Failure is logged and reported;
    /// the in-memory values stay authoritative either way.
    pub fn save(&self) -> bool {
        let serialized = match serde_json::to_string_pretty(&self.settings) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to serialize settings: {}", e);
                return false;
            }
        };
        if let Err(e) = fs::write(&self.path, serialized) {
            log::error!("Error saving settings to '{}': {}", self.path.display(), e);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("settings.json"))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        assert_eq!(store.verbose_build(), 1);
        assert_eq!(store.toast_position(), "TOP_RIGHT");
    }

    #[test]
    fn test_set_persists_immediately() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);
        store.set_verbose_build(2);
        store.set_toast_position("BOTTOM_LEFT");

        let reopened = store_in(&dir);
        assert_eq!(reopened.verbose_build(), 2);
        assert_eq!(reopened.toast_position(), "BOTTOM_LEFT");
    }

    #[test]
    fn test_verbosity_is_clamped() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);
        store.set_verbose_build(9);
        assert_eq!(store.verbose_build(), 2);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("settings.json"), "{not json").expect("seed");
        let store = store_in(&dir);
        assert_eq!(store.verbose_build(), 1);
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("settings.json"), "{\"verbose_build\": 0}").expect("seed");
        let store = store_in(&dir);
        assert_eq!(store.verbose_build(), 0);
        assert_eq!(store.toast_position(), "TOP_RIGHT");
    }

    #[test]
    fn test_reset_to_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = store_in(&dir);
        store.set_verbose_build(0);
        store.reset_to_defaults();
        assert_eq!(store.verbose_build(), 1);

        let reopened = store_in(&dir);
        assert_eq!(reopened.verbose_build(), 1);
    }
}
