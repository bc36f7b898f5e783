// src/state.rs

use crate::models::{Author, FieldValue, Platform, TemplateConfig};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Registered change observers. Kept out of serialization and snapshots.
#[derive(Default)]
pub struct ObserverList(Vec<Box<dyn Fn() + Send>>);

impl ObserverList {
    fn notify_all(&self) {
        for observer in &self.0 {
            observer();
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverList({} observers)", self.0.len())
    }
}

/// The single mutable source of truth for a packaging job.
///
/// Every mutation goes through [`FormState::update`] (or the batch
/// [`FormState::restore`]), which is the sole path that fires the registered
/// change observers. Dependent views (command preview, auto-save) learn of
/// changes only through those observers; there is no polling.
#[derive(Serialize, Debug)]
pub struct FormState {
    // Building configuration
    pub python_app_path: String,
    pub app_path: String,
    pub output_directory: String,
    pub module_name: String,
    pub arch: String,
    pub flutter_args: Vec<String>,
    pub clear_build_cache: bool,
    pub template_path: String,
    pub template_dir: String,
    pub template_ref: String,

    // App information
    pub project_name: String,
    pub product_name: String,
    pub description: String,
    pub organization: String,
    pub author: Option<Author>,

    // Versioning
    pub build_number: String,
    pub build_version: String,

    // Appearance
    pub splash_screen_color: String,
    pub splash_screen_dark_color: String,
    pub app_icon: String,
    pub disable_web_splash_screen: bool,
    pub disable_ios_splash_screen: bool,
    pub disable_android_splash_screen: bool,

    // Package options
    pub include_optional_controls: Vec<String>,
    pub exclude_additional_files: Vec<String>,
    pub compile_app_py_files: bool,
    pub compile_site_packages_py_files: bool,
    pub remove_unnecessary_app_files: bool,
    pub remove_unnecessary_package_files: bool,

    // Web specific options
    pub base_url: String,
    pub web_renderer: String,
    pub route_url_strategy: String,
    pub pwa_background_color: String,
    pub pwa_theme_color: String,
    pub enable_color_emojis: bool,

    // iOS specific options
    pub team_id: String,
    pub export_method: String,
    pub signing_certificate: String,
    pub provisioning_profile: String,
    pub ios_info_plist: Vec<String>,
    pub ios_deep_linking_scheme: String,
    pub ios_deep_linking_host: String,

    // Android specific options
    pub android_metadata: Vec<String>,
    pub android_features: Vec<String>,
    pub android_permissions: Vec<String>,
    pub android_key_store: String,
    pub android_key_store_password: String,
    pub android_key_password: String,
    pub android_key_alias: String,
    pub android_deep_linking_scheme: String,
    pub android_deep_linking_host: String,
    pub split_apk_per_abi: bool,

    // macOS specific options
    pub macos_entitlements: Vec<String>,
    pub macos_info_plist: Vec<String>,

    // Runtime permissions
    pub permission_location: bool,
    pub permission_camera: bool,
    pub permission_microphone: bool,
    pub permission_photo_library: bool,

    /// Not part of snapshots: a platform is a session choice, not a persisted
    /// scalar.
    #[serde(skip)]
    pub selected_platform: Option<Platform>,

    /// 0: silent, 1: `-v`, 2: `-vv`.
    pub verbose_build_level: u8,

    #[serde(skip)]
    observers: ObserverList,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            python_app_path: String::new(),
            app_path: String::new(),
            output_directory: String::new(),
            module_name: String::new(),
            arch: String::new(),
            flutter_args: Vec::new(),
            clear_build_cache: false,
            template_path: String::new(),
            template_dir: String::new(),
            template_ref: String::new(),
            project_name: String::new(),
            product_name: String::new(),
            description: String::new(),
            organization: String::new(),
            author: None,
            build_number: "0".to_string(),
            build_version: "1.0.0".to_string(),
            splash_screen_color: String::new(),
            splash_screen_dark_color: String::new(),
            app_icon: String::new(),
            disable_web_splash_screen: false,
            disable_ios_splash_screen: false,
            disable_android_splash_screen: false,
            include_optional_controls: Vec::new(),
            exclude_additional_files: Vec::new(),
            compile_app_py_files: false,
            compile_site_packages_py_files: false,
            remove_unnecessary_app_files: false,
            remove_unnecessary_package_files: false,
            base_url: String::new(),
            web_renderer: String::new(),
            route_url_strategy: String::new(),
            pwa_background_color: String::new(),
            pwa_theme_color: String::new(),
            enable_color_emojis: false,
            team_id: String::new(),
            export_method: String::new(),
            signing_certificate: String::new(),
            provisioning_profile: String::new(),
            ios_info_plist: Vec::new(),
            ios_deep_linking_scheme: String::new(),
            ios_deep_linking_host: String::new(),
            android_metadata: Vec::new(),
            android_features: Vec::new(),
            android_permissions: Vec::new(),
            android_key_store: String::new(),
            android_key_store_password: String::new(),
            android_key_password: String::new(),
            android_key_alias: String::new(),
            android_deep_linking_scheme: String::new(),
            android_deep_linking_host: String::new(),
            split_apk_per_abi: false,
            macos_entitlements: Vec::new(),
            macos_info_plist: Vec::new(),
            permission_location: false,
            permission_camera: false,
            permission_microphone: false,
            permission_photo_library: false,
            selected_platform: None,
            verbose_build_level: 0,
            observers: ObserverList::default(),
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a change observer. Observers fire synchronously, exactly once
    /// per logical update. They must not write back into the state.
    pub fn observe(&mut self, observer: impl Fn() + Send + 'static) {
        self.observers.0.push(Box::new(observer));
    }

    /// Sets one property by name and notifies observers.
    ///
    /// An unknown property name is a deliberate no-op, never an error: the
    /// catalog is allowed to describe fields the state does not carry yet. A
    /// value of the wrong shape for a known property is likewise dropped.
    pub fn update(&mut self, property: &str, value: FieldValue) {
        if self.apply(property, value) {
            self.observers.notify_all();
        }
    }

    /// Snapshot of every field except the observers and the selected platform,
    /// keyed by property name.
    pub fn snapshot(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Applies every matching key from `data`, then notifies observers once
    /// (batch semantics). Unknown keys and null values are skipped.
    pub fn restore(&mut self, data: &Map<String, Value>) {
        for (key, value) in data {
            if let Some(field_value) = field_value_from_json(value) {
                self.apply(key, field_value);
            }
        }
        self.observers.notify_all();
    }

    /// The three template sub-fields bundled as one composite value.
    pub fn template_config(&self) -> TemplateConfig {
        TemplateConfig {
            path: self.template_path.clone(),
            dir: self.template_dir.clone(),
            git_ref: self.template_ref.clone(),
        }
    }

    /// Permission names enabled in the state, in catalog order.
    pub fn enabled_permissions(&self) -> Vec<&'static str> {
        let flags = [
            ("location", self.permission_location),
            ("camera", self.permission_camera),
            ("microphone", self.permission_microphone),
            ("photo_library", self.permission_photo_library),
        ];
        flags
            .into_iter()
            .filter_map(|(name, enabled)| enabled.then_some(name))
            .collect()
    }

    /// The property-name dispatch table. Returns whether a field was written.
    fn apply(&mut self, property: &str, value: FieldValue) -> bool {
        match property {
            "python_app_path" => set_text(&mut self.python_app_path, value),
            "app_path" => set_text(&mut self.app_path, value),
            "output_directory" => set_text(&mut self.output_directory, value),
            "module_name" => set_text(&mut self.module_name, value),
            "arch" => set_text(&mut self.arch, value),
            "flutter_args" => set_items(&mut self.flutter_args, value),
            "clear_build_cache" => set_flag(&mut self.clear_build_cache, value),
            "template_path" => set_text(&mut self.template_path, value),
            "template_dir" => set_text(&mut self.template_dir, value),
            "template_ref" => set_text(&mut self.template_ref, value),
            "project_name" => set_text(&mut self.project_name, value),
            "product_name" => set_text(&mut self.product_name, value),
            "description" => set_text(&mut self.description, value),
            "organization" => set_text(&mut self.organization, value),
            "author" => match value {
                FieldValue::Author(author) => {
                    self.author = Some(author);
                    true
                }
                _ => reject(property, &value),
            },
            "build_number" => set_text(&mut self.build_number, value),
            "build_version" => set_text(&mut self.build_version, value),
            "splash_screen_color" => set_text(&mut self.splash_screen_color, value),
            "splash_screen_dark_color" => set_text(&mut self.splash_screen_dark_color, value),
            "app_icon" => set_text(&mut self.app_icon, value),
            "disable_web_splash_screen" => set_flag(&mut self.disable_web_splash_screen, value),
            "disable_ios_splash_screen" => set_flag(&mut self.disable_ios_splash_screen, value),
            "disable_android_splash_screen" => {
                set_flag(&mut self.disable_android_splash_screen, value)
            }
            "include_optional_controls" => set_items(&mut self.include_optional_controls, value),
            "exclude_additional_files" => set_items(&mut self.exclude_additional_files, value),
            "compile_app_py_files" => set_flag(&mut self.compile_app_py_files, value),
            "compile_site_packages_py_files" => {
                set_flag(&mut self.compile_site_packages_py_files, value)
            }
            "remove_unnecessary_app_files" => set_flag(&mut self.remove_unnecessary_app_files, value),
            "remove_unnecessary_package_files" => {
                set_flag(&mut self.remove_unnecessary_package_files, value)
            }
            "base_url" => set_text(&mut self.base_url, value),
            "web_renderer" => set_text(&mut self.web_renderer, value),
            "route_url_strategy" => set_text(&mut self.route_url_strategy, value),
            "pwa_background_color" => set_text(&mut self.pwa_background_color, value),
            "pwa_theme_color" => set_text(&mut self.pwa_theme_color, value),
            "enable_color_emojis" => set_flag(&mut self.enable_color_emojis, value),
            "team_id" => set_text(&mut self.team_id, value),
            "export_method" => set_text(&mut self.export_method, value),
            "signing_certificate" => set_text(&mut self.signing_certificate, value),
            "provisioning_profile" => set_text(&mut self.provisioning_profile, value),
            "ios_info_plist" => set_items(&mut self.ios_info_plist, value),
            "ios_deep_linking_scheme" => set_text(&mut self.ios_deep_linking_scheme, value),
            "ios_deep_linking_host" => set_text(&mut self.ios_deep_linking_host, value),
            "android_metadata" => set_items(&mut self.android_metadata, value),
            "android_features" => set_items(&mut self.android_features, value),
            "android_permissions" => set_items(&mut self.android_permissions, value),
            "android_key_store" => set_text(&mut self.android_key_store, value),
            "android_key_store_password" => set_text(&mut self.android_key_store_password, value),
            "android_key_password" => set_text(&mut self.android_key_password, value),
            "android_key_alias" => set_text(&mut self.android_key_alias, value),
            "android_deep_linking_scheme" => set_text(&mut self.android_deep_linking_scheme, value),
            "android_deep_linking_host" => set_text(&mut self.android_deep_linking_host, value),
            "split_apk_per_abi" => set_flag(&mut self.split_apk_per_abi, value),
            "macos_entitlements" => set_items(&mut self.macos_entitlements, value),
            "macos_info_plist" => set_items(&mut self.macos_info_plist, value),
            "permission_location" => set_flag(&mut self.permission_location, value),
            "permission_camera" => set_flag(&mut self.permission_camera, value),
            "permission_microphone" => set_flag(&mut self.permission_microphone, value),
            "permission_photo_library" => set_flag(&mut self.permission_photo_library, value),
            "selected_platform" => match value {
                FieldValue::Platform(platform) => {
                    self.selected_platform = platform;
                    true
                }
                _ => reject(property, &value),
            },
            "verbose_build_level" => match value {
                FieldValue::Level(level) => {
                    self.verbose_build_level = level;
                    true
                }
                _ => reject(property, &value),
            },
            _ => {
                log::trace!("Ignoring update for unknown property '{}'.", property);
                false
            }
        }
    }
}

fn set_text(slot: &mut String, value: FieldValue) -> bool {
    match value.into_text() {
        Some(text) => {
            *slot = text;
            true
        }
        None => false,
    }
}

fn set_flag(slot: &mut bool, value: FieldValue) -> bool {
    match value.into_flag() {
        Some(flag) => {
            *slot = flag;
            true
        }
        None => false,
    }
}

fn set_items(slot: &mut Vec<String>, value: FieldValue) -> bool {
    match value.into_items() {
        Some(items) => {
            *slot = items;
            true
        }
        None => false,
    }
}

fn reject(property: &str, value: &FieldValue) -> bool {
    log::warn!(
        "Dropping update for '{}': value shape {:?} does not match the field.",
        property,
        value
    );
    false
}

/// Maps a snapshot JSON value back to a [`FieldValue`]. `Null` (and shapes no
/// field accepts) yield `None`.
fn field_value_from_json(value: &Value) -> Option<FieldValue> {
    match value {
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Bool(b) => Some(FieldValue::Flag(*b)),
        Value::Array(items) => Some(FieldValue::Items(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )),
        Value::Number(n) => {
            let level = n.as_u64().and_then(|n| u8::try_from(n).ok())?;
            Some(FieldValue::Level(level))
        }
        Value::Object(_) => serde_json::from_value::<Author>(value.clone())
            .ok()
            .map(FieldValue::Author),
        Value::Null => None,
    }
}
