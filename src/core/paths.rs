// src/core/paths.rs

use crate::constants::{SETTINGS_DIR, SETTINGS_FILENAME};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find the user home directory.")]
    HomeDirNotFound,
    #[error("Could not create settings directory at '{path}': {source}")]
    SettingsDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Expands a leading `~` in a user-supplied path. Environment variables are
/// left untouched; project paths come from a text field, not a shell.
pub fn expand_user(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Returns the path to the settings file (`~/.fletfactory/settings.json`),
/// creating the directory if needed.
pub fn settings_file_path() -> Result<PathBuf, PathError> {
    let settings_dir = dirs::home_dir()
        .ok_or(PathError::HomeDirNotFound)?
        .join(SETTINGS_DIR);

    if !settings_dir.exists() {
        fs::create_dir_all(&settings_dir).map_err(|e| PathError::SettingsDirCreation {
            path: settings_dir.display().to_string(),
            source: e,
        })?;
    }

    Ok(settings_dir.join(SETTINGS_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_user_resolves_tilde() {
        let expanded = expand_user("~/app");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("app"));
        }
    }

    #[test]
    fn test_expand_user_leaves_plain_paths_alone() {
        assert_eq!(expand_user("/tmp/project"), PathBuf::from("/tmp/project"));
        assert_eq!(expand_user("relative/dir"), PathBuf::from("relative/dir"));
    }
}
