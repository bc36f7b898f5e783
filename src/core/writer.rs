// src/core/writer.rs
//
// Serializes the form state back into a project's pyproject.toml, merging
// additively into whatever the file already contains. Only meaningful values
// are written: empty strings, empty lists and `false` flags are omitted, so
// "unset" and "explicitly off" are indistinguishable in the persisted file.

use crate::constants::{PYPROJECT_FILENAME, TOOL_NAMESPACE};
use crate::core::paths;
use crate::state::FormState;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use thiserror::Error;
use toml::{Table, Value};

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Existing pyproject could not be parsed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize pyproject: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to replace pyproject atomically: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Saves `state` to `<project_dir>/pyproject.toml`. Failures are logged and
/// reported as `false`; "could not save" is always recoverable for the caller.
pub fn save_to_path(project_dir: &str, state: &FormState) -> bool {
    match write_pyproject(project_dir, state) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Error saving pyproject.toml under '{}': {}", project_dir, e);
            false
        }
    }
}

fn write_pyproject(project_dir: &str, state: &FormState) -> Result<(), WriterError> {
    let dir = paths::expand_user(project_dir);
    let file_path = dir.join(PYPROJECT_FILENAME);

    // Merge into the existing document so unrelated keys survive.
    let mut root: Table = if file_path.exists() {
        toml::from_str(&fs::read_to_string(&file_path)?)?
    } else {
        Table::new()
    };

    update_project_section(ensure_table(&mut root, "project"), state);
    let tool = ensure_table(&mut root, "tool");
    update_tool_section(ensure_table(tool, TOOL_NAMESPACE), state);

    let serialized = toml::to_string(&root)?;

    // Write to a sibling temp file and swap it in, so a fault mid-write never
    // corrupts the previous valid document.
    let mut temp = NamedTempFile::new_in(&dir)?;
    temp.write_all(serialized.as_bytes())?;
    temp.persist(&file_path)?;

    log::debug!("Saved pyproject.toml to '{}'.", file_path.display());
    Ok(())
}

/// `[project]`: name, version, description.
fn update_project_section(project: &mut Table, state: &FormState) {
    set_string(project, "name", &state.project_name);
    set_string(project, "version", &state.build_version);
    set_string(project, "description", &state.description);
}

/// `[tool.flet]` and its nested sections.
fn update_tool_section(flet: &mut Table, state: &FormState) {
    set_string(flet, "product", &state.product_name);
    set_string(flet, "org", &state.organization);
    if !state.build_number.is_empty() && state.build_number != "0" {
        flet.insert("build_number".to_string(), Value::String(state.build_number.clone()));
    }
    set_string(flet, "arch", &state.arch);

    if !state.include_optional_controls.is_empty() {
        let flutter = ensure_table(flet, "flutter");
        flutter.insert(
            "dependencies".to_string(),
            string_list(&state.include_optional_controls),
        );
    }

    // App section only materializes when it would carry a module or excludes.
    if !state.module_name.is_empty() || !state.exclude_additional_files.is_empty() {
        let app = ensure_table(flet, "app");
        set_string(app, "path", &state.app_path);
        set_string(app, "module", &state.module_name);
        if !state.exclude_additional_files.is_empty() {
            app.insert("exclude".to_string(), string_list(&state.exclude_additional_files));
        }
    }

    if state.compile_app_py_files || state.compile_site_packages_py_files {
        let compile = ensure_table(flet, "compile");
        set_true(compile, "app", state.compile_app_py_files);
        set_true(compile, "packages", state.compile_site_packages_py_files);
    }

    if state.remove_unnecessary_app_files || state.remove_unnecessary_package_files {
        let cleanup = ensure_table(flet, "cleanup");
        set_true(cleanup, "app_files", state.remove_unnecessary_app_files);
        set_true(cleanup, "package_files", state.remove_unnecessary_package_files);
    }

    let has_splash = !state.splash_screen_color.is_empty()
        || !state.splash_screen_dark_color.is_empty()
        || state.disable_web_splash_screen
        || state.disable_ios_splash_screen
        || state.disable_android_splash_screen;
    if has_splash {
        let splash = ensure_table(flet, "splash");
        set_string(splash, "color", &state.splash_screen_color);
        set_string(splash, "dark_color", &state.splash_screen_dark_color);
        // Splash flags persist inverted: the state says "disabled", the file
        // says "enabled = false", and only when disabled.
        if state.disable_web_splash_screen {
            splash.insert("web".to_string(), Value::Boolean(false));
        }
        if state.disable_ios_splash_screen {
            splash.insert("ios".to_string(), Value::Boolean(false));
        }
        if state.disable_android_splash_screen {
            splash.insert("android".to_string(), Value::Boolean(false));
        }
    }

    let permissions = state.enabled_permissions();
    if !permissions.is_empty() {
        flet.insert(
            "permissions".to_string(),
            Value::Array(permissions.into_iter().map(|p| Value::String(p.to_string())).collect()),
        );
    }

    update_web_section(flet, state);
    update_ios_section(flet, state);
    update_android_section(flet, state);
    update_macos_section(flet, state);
    update_deep_linking(flet, state);

    if !state.flutter_args.is_empty() {
        let flutter = ensure_table(flet, "flutter");
        flutter.insert("build_args".to_string(), string_list(&state.flutter_args));
    }
}

fn update_web_section(flet: &mut Table, state: &FormState) {
    let has_web = !state.base_url.is_empty()
        || !state.web_renderer.is_empty()
        || !state.route_url_strategy.is_empty()
        || !state.pwa_background_color.is_empty()
        || !state.pwa_theme_color.is_empty()
        || state.enable_color_emojis;
    if !has_web {
        return;
    }

    let web = ensure_table(flet, "web");
    set_string(web, "base_url", &state.base_url);
    set_string(web, "renderer", &state.web_renderer);
    set_string(web, "route_url_strategy", &state.route_url_strategy);
    set_string(web, "pwa_background_color", &state.pwa_background_color);
    set_string(web, "pwa_theme_color", &state.pwa_theme_color);
    set_true(web, "use_color_emoji", state.enable_color_emojis);
}

fn update_ios_section(flet: &mut Table, state: &FormState) {
    let has_ios = !state.team_id.is_empty()
        || !state.export_method.is_empty()
        || !state.signing_certificate.is_empty()
        || !state.provisioning_profile.is_empty()
        || !state.ios_info_plist.is_empty();
    if !has_ios {
        return;
    }

    let ios = ensure_table(flet, "ios");
    set_string(ios, "team_id", &state.team_id);
    set_string(ios, "export_method", &state.export_method);
    set_string(ios, "signing_certificate", &state.signing_certificate);
    set_string(ios, "provisioning_profile", &state.provisioning_profile);
    if !state.ios_info_plist.is_empty() {
        ios.insert("info".to_string(), string_list(&state.ios_info_plist));
    }
}

fn update_android_section(flet: &mut Table, state: &FormState) {
    let has_android = !state.android_metadata.is_empty()
        || !state.android_features.is_empty()
        || !state.android_permissions.is_empty()
        || !state.android_key_store.is_empty()
        || !state.android_key_alias.is_empty()
        || state.split_apk_per_abi;
    if !has_android {
        return;
    }

    let android = ensure_table(flet, "android");
    if !state.android_metadata.is_empty() {
        android.insert("meta_data".to_string(), string_list(&state.android_metadata));
    }
    if !state.android_features.is_empty() {
        android.insert("feature".to_string(), string_list(&state.android_features));
    }
    if !state.android_permissions.is_empty() {
        android.insert("permission".to_string(), string_list(&state.android_permissions));
    }
    set_true(android, "split_per_abi", state.split_apk_per_abi);

    if !state.android_key_store.is_empty() || !state.android_key_alias.is_empty() {
        let signing = ensure_table(android, "signing");
        set_string(signing, "key_store", &state.android_key_store);
        set_string(signing, "key_alias", &state.android_key_alias);
    }
}

fn update_macos_section(flet: &mut Table, state: &FormState) {
    if state.macos_entitlements.is_empty() && state.macos_info_plist.is_empty() {
        return;
    }

    let macos = ensure_table(flet, "macos");
    if !state.macos_entitlements.is_empty() {
        macos.insert("entitlement".to_string(), string_list(&state.macos_entitlements));
    }
    if !state.macos_info_plist.is_empty() {
        macos.insert("info".to_string(), string_list(&state.macos_info_plist));
    }
}

/// Deep-linking merge: when both platforms agree on a non-empty scheme (or
/// host), that dimension is written once under the shared `deep_linking`
/// section; a differing or one-sided value lands under its platform section
/// instead, and the shared section is not written for that dimension.
fn update_deep_linking(flet: &mut Table, state: &FormState) {
    let ios_scheme = &state.ios_deep_linking_scheme;
    let android_scheme = &state.android_deep_linking_scheme;
    let ios_host = &state.ios_deep_linking_host;
    let android_host = &state.android_deep_linking_host;

    let shared_scheme = !ios_scheme.is_empty() && ios_scheme == android_scheme;
    let shared_host = !ios_host.is_empty() && ios_host == android_host;

    if shared_scheme || shared_host {
        let shared = ensure_table(flet, "deep_linking");
        if shared_scheme {
            shared.insert("scheme".to_string(), Value::String(ios_scheme.clone()));
        }
        if shared_host {
            shared.insert("host".to_string(), Value::String(ios_host.clone()));
        }
    }

    if !ios_scheme.is_empty() && !shared_scheme {
        let section = ensure_table(ensure_table(flet, "ios"), "deep_linking");
        section.insert("scheme".to_string(), Value::String(ios_scheme.clone()));
    }
    if !ios_host.is_empty() && !shared_host {
        let section = ensure_table(ensure_table(flet, "ios"), "deep_linking");
        section.insert("host".to_string(), Value::String(ios_host.clone()));
    }
    if !android_scheme.is_empty() && !shared_scheme {
        let section = ensure_table(ensure_table(flet, "android"), "deep_linking");
        section.insert("scheme".to_string(), Value::String(android_scheme.clone()));
    }
    if !android_host.is_empty() && !shared_host {
        let section = ensure_table(ensure_table(flet, "android"), "deep_linking");
        section.insert("host".to_string(), Value::String(android_host.clone()));
    }
}

/// Returns the nested table at `key`, creating it if missing. An existing
/// scalar at that key is replaced: the section layout wins over stray values.
fn ensure_table<'a>(parent: &'a mut Table, key: &str) -> &'a mut Table {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Table(Table::new()));
    if !slot.is_table() {
        log::warn!("Replacing non-table value at '{}' with a section.", key);
        *slot = Value::Table(Table::new());
    }
    slot.as_table_mut().expect("slot was just ensured to be a table")
}

fn set_string(table: &mut Table, key: &str, value: &str) {
    if !value.is_empty() {
        table.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn set_true(table: &mut Table, key: &str, flag: bool) {
    if flag {
        table.insert(key.to_string(), Value::Boolean(true));
    }
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().map(|item| Value::String(item.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::PyprojectDoc;
    use crate::core::populator;
    use crate::models::{FieldValue, Platform};
    use tempfile::TempDir;

    fn save_and_read(state: &FormState) -> (TempDir, Table) {
        let dir = TempDir::new().expect("tempdir");
        let project_dir = dir.path().display().to_string();
        assert!(save_to_path(&project_dir, state));
        let raw = fs::read_to_string(dir.path().join(PYPROJECT_FILENAME)).expect("read");
        let table: Table = toml::from_str(&raw).expect("parse");
        (dir, table)
    }

    fn lookup(table: &Table, dotted: &str) -> Option<Value> {
        PyprojectDoc::from_value(Value::Table(table.clone()))
            .lookup(dotted)
            .cloned()
    }

    #[test]
    fn test_false_and_empty_values_are_never_written() {
        let state = FormState::new();
        let (_dir, table) = save_and_read(&state);

        // Defaults: only project.version (the non-default "1.0.0") lands.
        assert_eq!(lookup(&table, "project.version"), Some(Value::String("1.0.0".into())));
        assert!(lookup(&table, "project.name").is_none());
        assert!(lookup(&table, "tool.flet.build_number").is_none());
        assert!(lookup(&table, "tool.flet.compile").is_none());
        assert!(lookup(&table, "tool.flet.splash").is_none());
        assert!(lookup(&table, "tool.flet.web").is_none());
        assert!(lookup(&table, "tool.flet.permissions").is_none());
    }

    #[test]
    fn test_build_number_written_only_when_not_default() {
        let mut state = FormState::new();
        state.update("build_number", FieldValue::Text("7".to_string()));
        let (_dir, table) = save_and_read(&state);
        assert_eq!(lookup(&table, "tool.flet.build_number"), Some(Value::String("7".into())));

        let default_state = FormState::new();
        let (_dir, table) = save_and_read(&default_state);
        assert!(lookup(&table, "tool.flet.build_number").is_none());
    }

    #[test]
    fn test_splash_flags_persist_inverted() {
        let mut state = FormState::new();
        state.update("disable_web_splash_screen", FieldValue::Flag(true));
        let (_dir, table) = save_and_read(&state);
        assert_eq!(lookup(&table, "tool.flet.splash.web"), Some(Value::Boolean(false)));
        assert!(lookup(&table, "tool.flet.splash.ios").is_none());
    }

    #[test]
    fn test_deep_linking_equal_values_merge_into_shared_section() {
        let mut state = FormState::new();
        state.update("ios_deep_linking_scheme", FieldValue::Text("https".to_string()));
        state.update("android_deep_linking_scheme", FieldValue::Text("https".to_string()));
        let (_dir, table) = save_and_read(&state);

        assert_eq!(
            lookup(&table, "tool.flet.deep_linking.scheme"),
            Some(Value::String("https".into()))
        );
        assert!(lookup(&table, "tool.flet.ios.deep_linking").is_none());
        assert!(lookup(&table, "tool.flet.android.deep_linking").is_none());
    }

    #[test]
    fn test_deep_linking_differing_values_stay_per_platform() {
        let mut state = FormState::new();
        state.update("ios_deep_linking_scheme", FieldValue::Text("https".to_string()));
        state.update("android_deep_linking_scheme", FieldValue::Text("myapp".to_string()));
        let (_dir, table) = save_and_read(&state);

        assert!(lookup(&table, "tool.flet.deep_linking").is_none());
        assert_eq!(
            lookup(&table, "tool.flet.ios.deep_linking.scheme"),
            Some(Value::String("https".into()))
        );
        assert_eq!(
            lookup(&table, "tool.flet.android.deep_linking.scheme"),
            Some(Value::String("myapp".into()))
        );
    }

    #[test]
    fn test_save_preserves_unrelated_keys() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(
            dir.path().join(PYPROJECT_FILENAME),
            "[build-system]\nrequires = [\"setuptools\"]\n\n[project]\nreadme = \"README.md\"\n",
        )
        .expect("seed");

        let mut state = FormState::new();
        state.update("project_name", FieldValue::Text("demo".to_string()));
        let project_dir = dir.path().display().to_string();
        assert!(save_to_path(&project_dir, &state));

        let raw = fs::read_to_string(dir.path().join(PYPROJECT_FILENAME)).expect("read");
        let table: Table = toml::from_str(&raw).expect("parse");
        assert_eq!(
            lookup(&table, "build-system.requires"),
            Some(Value::Array(vec![Value::String("setuptools".into())]))
        );
        assert_eq!(lookup(&table, "project.readme"), Some(Value::String("README.md".into())));
        assert_eq!(lookup(&table, "project.name"), Some(Value::String("demo".into())));
    }

    #[test]
    fn test_saving_twice_is_byte_identical() {
        let dir = TempDir::new().expect("tempdir");
        let project_dir = dir.path().display().to_string();

        let mut state = FormState::new();
        state.update("project_name", FieldValue::Text("demo".to_string()));
        state.update("module_name", FieldValue::Text("main".to_string()));
        state.update("permission_camera", FieldValue::Flag(true));
        state.update(
            "exclude_additional_files",
            FieldValue::Items(vec!["__pycache__/".to_string()]),
        );

        assert!(save_to_path(&project_dir, &state));
        let first = fs::read(dir.path().join(PYPROJECT_FILENAME)).expect("read");
        assert!(save_to_path(&project_dir, &state));
        let second = fs::read(dir.path().join(PYPROJECT_FILENAME)).expect("read");
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_then_populate_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let project_dir = dir.path().display().to_string();

        let mut state = FormState::new();
        state.update("project_name", FieldValue::Text("demo".to_string()));
        state.update("build_version", FieldValue::Text("2.0.0".to_string()));
        state.update("selected_platform", FieldValue::Platform(Some(Platform::Web)));
        assert!(save_to_path(&project_dir, &state));

        let doc = PyprojectDoc::load(&project_dir).expect("load").expect("doc");
        let mut fresh = FormState::new();
        populator::populate(&doc, &mut fresh);

        assert_eq!(fresh.project_name, "demo");
        assert_eq!(fresh.build_version, "2.0.0");
        // Platform and author are session/structured values, excluded from the
        // round trip by design.
        assert_eq!(fresh.selected_platform, None);
    }

    #[test]
    fn test_save_failure_reports_false() {
        let state = FormState::new();
        assert!(!save_to_path("/nonexistent-root/definitely/missing", &state));
    }
}
