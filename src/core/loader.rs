// src/core/loader.rs
//
// Read-only access to a project's pyproject.toml, addressed by dotted paths.

use crate::constants::PYPROJECT_FILENAME;
use crate::core::paths;
use std::fs;
use thiserror::Error;
use toml::Value;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// An immutable view of a parsed project metadata document.
#[derive(Debug, Clone)]
pub struct PyprojectDoc {
    root: Value,
}

impl PyprojectDoc {
    /// Loads `<project_dir>/pyproject.toml`, expanding a leading `~` first.
    ///
    /// A missing or unreadable file is "no existing configuration", not an
    /// error, and yields `Ok(None)`. A file that exists but does not parse is
    /// a recoverable condition the caller should surface.
    pub fn load(project_dir: &str) -> Result<Option<Self>, LoaderError> {
        let file_path = paths::expand_user(project_dir).join(PYPROJECT_FILENAME);

        let raw = match fs::read_to_string(&file_path) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("No readable pyproject at '{}': {}", file_path.display(), e);
                return Ok(None);
            }
        };

        let root: Value = toml::from_str(&raw).map_err(|e| LoaderError::Parse {
            path: file_path.display().to_string(),
            source: e,
        })?;

        log::debug!("Loaded pyproject from '{}'.", file_path.display());
        Ok(Some(Self { root }))
    }

    /// Builds a document from an already-parsed value. Used by tests and by
    /// callers that hold TOML from another source.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The whole document.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Walks a dotted path (`tool.flet.web.base_url`) through the document.
    /// Returns `None` the moment a segment is missing or an intermediate value
    /// is not a table.
    pub fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in dotted_path.split('.') {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }
}
