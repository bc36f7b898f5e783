// src/core/populator.rs
//
// Pulls values from a loaded pyproject document into the form state, driven by
// declarative mapping tables. Three rule classes plus two special cases; no
// property is touched by more than one rule.

use crate::core::loader::PyprojectDoc;
use crate::models::{Author, FieldValue};
use crate::state::FormState;
use toml::Value;

/// Direct mappings: property -> ordered candidate paths. The first path that
/// resolves to a truthy value wins; later candidates are not tried.
const DIRECT_MAPPINGS: &[(&str, &[&str])] = &[
    ("module_name", &["tool.flet.app.module"]),
    ("app_path", &["tool.flet.app.path"]),
    ("project_name", &["project.name", "tool.poetry.name"]),
    ("product_name", &["tool.flet.product"]),
    ("description", &["project.description", "tool.poetry.description"]),
    ("organization", &["tool.flet.org"]),
    ("arch", &["tool.flet.arch"]),
    ("build_number", &["tool.flet.build_number"]),
    ("build_version", &["project.version", "tool.poetry.version"]),
    ("splash_screen_color", &["tool.flet.splash.color"]),
    ("splash_screen_dark_color", &["tool.flet.splash.dark_color"]),
    ("base_url", &["tool.flet.web.base_url"]),
    ("web_renderer", &["tool.flet.web.renderer"]),
    ("route_url_strategy", &["tool.flet.web.route_url_strategy"]),
    ("pwa_background_color", &["tool.flet.web.pwa_background_color"]),
    ("pwa_theme_color", &["tool.flet.web.pwa_theme_color"]),
    ("team_id", &["tool.flet.ios.team_id"]),
    ("export_method", &["tool.flet.ios.export_method"]),
    ("signing_certificate", &["tool.flet.ios.signing_certificate"]),
    ("provisioning_profile", &["tool.flet.ios.provisioning_profile"]),
    ("ios_info_plist", &["tool.flet.ios.info"]),
    (
        "ios_deep_linking_scheme",
        &["tool.flet.ios.deep_linking.scheme", "tool.flet.deep_linking.scheme"],
    ),
    (
        "ios_deep_linking_host",
        &["tool.flet.ios.deep_linking.host", "tool.flet.deep_linking.host"],
    ),
    (
        "android_deep_linking_scheme",
        &["tool.flet.android.deep_linking.scheme", "tool.flet.deep_linking.scheme"],
    ),
    (
        "android_deep_linking_host",
        &["tool.flet.android.deep_linking.host", "tool.flet.deep_linking.host"],
    ),
    ("android_metadata", &["tool.flet.android.meta_data"]),
    ("android_features", &["tool.flet.android.feature"]),
    ("android_permissions", &["tool.flet.android.permission"]),
    ("android_key_store", &["tool.flet.android.signing.key_store"]),
    ("android_key_alias", &["tool.flet.android.signing.key_alias"]),
    ("macos_entitlements", &["tool.flet.macos.entitlement"]),
    ("macos_info_plist", &["tool.flet.macos.info"]),
    ("exclude_additional_files", &["tool.flet.app.exclude"]),
    ("include_optional_controls", &["tool.flet.flutter.dependencies"]),
    ("flutter_args", &["tool.flet.flutter.build_args"]),
];

/// The metadata expresses "splash enabled", the state expresses "disabled":
/// a present boolean loads inverted.
const INVERTED_BOOL_MAPPINGS: &[(&str, &str)] = &[
    ("disable_web_splash_screen", "tool.flet.splash.web"),
    ("disable_ios_splash_screen", "tool.flet.splash.ios"),
    ("disable_android_splash_screen", "tool.flet.splash.android"),
];

/// Plain booleans load literally whenever present, explicit `false` included.
const PLAIN_BOOL_MAPPINGS: &[(&str, &str)] = &[
    ("compile_app_py_files", "tool.flet.compile.app"),
    ("compile_site_packages_py_files", "tool.flet.compile.packages"),
    ("remove_unnecessary_app_files", "tool.flet.cleanup.app_files"),
    ("remove_unnecessary_package_files", "tool.flet.cleanup.package_files"),
    ("enable_color_emojis", "tool.flet.web.use_color_emoji"),
    ("split_apk_per_abi", "tool.flet.android.split_per_abi"),
];

/// The template composite: sub-keys flatten to their own state properties.
const TEMPLATE_MAPPINGS: &[(&str, &str)] = &[
    ("template_path", "tool.flet.template.path"),
    ("template_dir", "tool.flet.template.dir"),
    ("template_ref", "tool.flet.template.ref"),
];

/// Applies every mapping rule to `state`. Absent paths are skipped; nothing is
/// defaulted and nothing errors.
pub fn populate(doc: &PyprojectDoc, state: &mut FormState) {
    populate_author(doc, state);

    for (property, candidates) in DIRECT_MAPPINGS {
        for path in *candidates {
            if let Some(value) = doc.lookup(path).filter(|v| is_truthy(v)) {
                if let Some(field_value) = field_value_from_toml(value) {
                    state.update(property, field_value);
                }
                break;
            }
        }
    }

    for (property, path) in INVERTED_BOOL_MAPPINGS {
        if let Some(flag) = doc.lookup(path).and_then(Value::as_bool) {
            state.update(property, FieldValue::Flag(!flag));
        }
    }

    for (property, path) in PLAIN_BOOL_MAPPINGS {
        if let Some(flag) = doc.lookup(path).and_then(Value::as_bool) {
            state.update(property, FieldValue::Flag(flag));
        }
    }

    for (property, path) in TEMPLATE_MAPPINGS {
        if let Some(value) = doc.lookup(path).filter(|v| is_truthy(v)) {
            if let Some(field_value) = field_value_from_toml(value) {
                state.update(property, field_value);
            }
        }
    }
}

/// `project.authors` is a list of `{name, email}` tables; the first entry with
/// a name becomes the structured author value.
fn populate_author(doc: &PyprojectDoc, state: &mut FormState) {
    let Some(authors) = doc.lookup("project.authors").and_then(Value::as_array) else {
        return;
    };
    let Some(entry) = authors.first().and_then(Value::as_table) else {
        return;
    };
    let Some(name) = entry.get("name").and_then(Value::as_str) else {
        return;
    };

    let author = Author {
        name: name.to_string(),
        email: entry.get("email").and_then(Value::as_str).map(str::to_string),
    };
    state.update("author", FieldValue::Author(author));
}

/// The "found" test for direct mappings. A boolean `false`, an empty string or
/// an empty list does not count as found here; only the boolean rule classes
/// load explicit `false` values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Table(table) => !table.is_empty(),
        Value::Boolean(b) => *b,
        Value::Integer(n) => *n != 0,
        Value::Float(f) => *f != 0.0,
        Value::Datetime(_) => true,
    }
}

/// Converts a metadata value to the shape `FormState::update` expects.
/// Integers are stringified: build_number is stored as text in the state.
fn field_value_from_toml(value: &Value) -> Option<FieldValue> {
    match value {
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Integer(n) => Some(FieldValue::Text(n.to_string())),
        Value::Float(f) => Some(FieldValue::Text(f.to_string())),
        Value::Boolean(b) => Some(FieldValue::Flag(*b)),
        Value::Array(items) => Some(FieldValue::Items(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(raw: &str) -> FormState {
        let doc = PyprojectDoc::from_value(toml::from_str(raw).expect("test TOML must parse"));
        let mut state = FormState::new();
        populate(&doc, &mut state);
        state
    }

    #[test]
    fn test_direct_mapping_prefers_project_over_poetry() {
        let state = populated(
            r#"
            [project]
            name = "new-style"
            [tool.poetry]
            name = "old-style"
            version = "3.1.4"
            "#,
        );
        assert_eq!(state.project_name, "new-style");
        // project.version is absent, so the poetry fallback wins.
        assert_eq!(state.build_version, "3.1.4");
    }

    #[test]
    fn test_build_number_integer_is_stringified() {
        let state = populated("[tool.flet]\nbuild_number = 42\n");
        assert_eq!(state.build_number, "42");
    }

    #[test]
    fn test_inverted_splash_booleans() {
        let state = populated(
            r#"
            [tool.flet.splash]
            web = false
            ios = true
            "#,
        );
        assert!(state.disable_web_splash_screen);
        assert!(!state.disable_ios_splash_screen);
        // android splash not present: default untouched.
        assert!(!state.disable_android_splash_screen);
    }

    #[test]
    fn test_plain_boolean_false_loads_literally() {
        let state = populated("[tool.flet.compile]\napp = false\npackages = true\n");
        assert!(!state.compile_app_py_files);
        assert!(state.compile_site_packages_py_files);
    }

    #[test]
    fn test_direct_mapping_skips_false_and_empty_values() {
        // The direct rule's truthiness test drops these; the asymmetry with
        // the boolean rules is intentional and load-bearing.
        let state = populated(
            r#"
            [tool.flet]
            arch = ""
            [tool.flet.app]
            exclude = []
            "#,
        );
        assert_eq!(state.arch, "");
        assert!(state.exclude_additional_files.is_empty());
    }

    #[test]
    fn test_deep_linking_platform_path_beats_shared() {
        let state = populated(
            r#"
            [tool.flet.deep_linking]
            scheme = "https"
            host = "shared.example.com"
            [tool.flet.ios.deep_linking]
            scheme = "myapp"
            "#,
        );
        assert_eq!(state.ios_deep_linking_scheme, "myapp");
        assert_eq!(state.ios_deep_linking_host, "shared.example.com");
        assert_eq!(state.android_deep_linking_scheme, "https");
    }

    #[test]
    fn test_template_composite_flattens() {
        let state = populated(
            r#"
            [tool.flet.template]
            path = "gh:my-org/my-repo"
            ref = "v1"
            "#,
        );
        assert_eq!(state.template_path, "gh:my-org/my-repo");
        assert_eq!(state.template_ref, "v1");
        assert_eq!(state.template_dir, "");
    }

    #[test]
    fn test_author_first_entry_with_name() {
        let state = populated(
            r#"
            [[project.authors]]
            name = "Ada Lovelace"
            email = "ada@example.com"
            [[project.authors]]
            name = "Second Author"
            "#,
        );
        let author = state.author.expect("author should load");
        assert_eq!(author.name, "Ada Lovelace");
        assert_eq!(author.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_authors_without_name_are_ignored() {
        let state = populated("[[project.authors]]\nemail = \"ada@example.com\"\n");
        assert!(state.author.is_none());
    }

    #[test]
    fn test_list_fields_load() {
        let state = populated(
            r#"
            [tool.flet.app]
            exclude = ["__pycache__/", "tests/"]
            [tool.flet.flutter]
            build_args = ["--no-tree-shake-icons"]
            dependencies = ["flet_video"]
            "#,
        );
        assert_eq!(state.exclude_additional_files, vec!["__pycache__/", "tests/"]);
        assert_eq!(state.flutter_args, vec!["--no-tree-shake-icons"]);
        assert_eq!(state.include_optional_controls, vec!["flet_video"]);
    }
}
