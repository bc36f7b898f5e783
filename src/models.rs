// src/models.rs

use serde::{Deserialize, Serialize};

// --- TARGET PLATFORMS ---

/// A target build output of the external tool. Each platform carries a
/// human-readable label for the UI and the lowercase token the CLI expects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Macos,
    Linux,
    AndroidApk,
    AndroidAab,
    Ios,
    Web,
}

impl Platform {
    /// Every platform the tool knows how to target, in presentation order.
    pub const ALL: [Self; 7] = [
        Self::Windows,
        Self::Macos,
        Self::Linux,
        Self::AndroidApk,
        Self::AndroidAab,
        Self::Ios,
        Self::Web,
    ];

    /// Display label shown in the platform picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Macos => "macOS",
            Self::Linux => "Linux",
            Self::AndroidApk => "Android (APK)",
            Self::AndroidAab => "Android (AAB)",
            Self::Ios => "iOS",
            Self::Web => "Web",
        }
    }

    /// The positional token passed to the build tool.
    pub fn cmd_token(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Linux => "linux",
            Self::AndroidApk => "apk",
            Self::AndroidAab => "aab",
            Self::Ios => "ipa",
            Self::Web => "web",
        }
    }

    /// Resolves a command-line token back to a platform.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.cmd_token() == token)
    }
}

/// Platforms that can actually be built from the given host OS
/// (`std::env::consts::OS` values). Unknown hosts get an empty list.
pub fn buildable_platforms(host_os: &str) -> &'static [Platform] {
    match host_os {
        "windows" => &[
            Platform::Windows,
            Platform::AndroidApk,
            Platform::AndroidAab,
            Platform::Linux,
            Platform::Web,
        ],
        "macos" => &[
            Platform::Macos,
            Platform::AndroidApk,
            Platform::AndroidAab,
            Platform::Ios,
            Platform::Linux,
            Platform::Web,
        ],
        "linux" => &[
            Platform::Linux,
            Platform::AndroidApk,
            Platform::AndroidAab,
            Platform::Web,
        ],
        _ => &[],
    }
}

// --- STRUCTURED FIELD VALUES ---

/// Author entry as found in `project.authors` of a pyproject file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The three sub-keys of the custom build-template configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateConfig {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub dir: String,
    #[serde(default, rename = "ref")]
    pub git_ref: String,
}

/// A value flowing into `FormState::update`. Field-bound UI widgets and the
/// populator both speak this type, so every mutation goes through one funnel.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text (also used for dropdown keys).
    Text(String),
    /// Checkbox state.
    Flag(bool),
    /// Multi-value "badge" list.
    Items(Vec<String>),
    /// Structured author entry.
    Author(Author),
    /// Target platform selection; `None` deselects.
    Platform(Option<Platform>),
    /// Verbosity level (0, 1 or 2).
    Level(u8),
}

impl FieldValue {
    pub(crate) fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn into_flag(self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(b),
            _ => None,
        }
    }

    pub(crate) fn into_items(self) -> Option<Vec<String>> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }
}

// --- FIELD CATALOG MODEL ---

/// The input widget kind a field is rendered with. The UI layer owns the
/// rendering; the core only uses this to pick sensible test/default values
/// and to group catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Text,
    Checkbox,
    Dropdown,
    Badges,
    Icon,
    Author,
    /// Multi-part template configuration (path / dir / ref sub-fields).
    Composite,
}

/// One `{key, label}` choice of a dropdown field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropdownOption {
    pub key: &'static str,
    pub label: &'static str,
}

/// Describes one configurable option: its identity, the state property it
/// binds to, and its presentation metadata. Constructed once at startup from
/// the static catalog and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Stable identifier, unique within the catalog.
    pub name: &'static str,
    /// The `FormState` property this field writes through `update`.
    pub property: &'static str,
    /// Display label; derived from `name` when empty.
    pub title: &'static str,
    /// Help text shown next to the field.
    pub hint: &'static str,
    pub widget: WidgetKind,
    /// Choices for `WidgetKind::Dropdown`, empty otherwise.
    pub options: &'static [DropdownOption],
}

impl FieldDefinition {
    /// The label to display: the explicit title, or the name with underscores
    /// replaced and each word capitalized.
    pub fn display_title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.to_string();
        }
        self.name
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
