// src/constants.rs

/// The project metadata file read and written at the root of a flet project.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

/// The external build tool invoked by the synthesized command.
pub const BUILD_TOOL: &str = "flet";

/// The subcommand of the build tool.
pub const BUILD_SUBCOMMAND: &str = "build";

/// The namespace under `[tool]` owned by this application's settings.
pub const TOOL_NAMESPACE: &str = "flet";

/// The name of the per-user settings directory (inside the home directory).
pub const SETTINGS_DIR: &str = ".fletfactory";

/// The name of the per-installation settings file (inside the settings directory).
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Delay before an auto-save fires; a new edit within this window restarts it.
pub const AUTOSAVE_DELAY_MS: u64 = 1000;
