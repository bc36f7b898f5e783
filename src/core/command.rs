// src/core/command.rs
//
// Turns the form state into the `flet build` invocation. Assembly is pure:
// no filesystem access beyond tilde expansion of the app path, and the state
// is never mutated, so the preview shown to the user is exactly what runs.

use crate::constants::{BUILD_SUBCOMMAND, BUILD_TOOL};
use crate::core::paths;
use crate::state::FormState;

/// A single CLI argument value before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CliValue {
    Text(String),
    Switch(bool),
    Items(Vec<String>),
}

impl CliValue {
    pub fn is_set(&self) -> bool {
        match self {
            CliValue::Text(s) => !s.is_empty(),
            CliValue::Switch(on) => *on,
            CliValue::Items(items) => !items.is_empty(),
        }
    }
}

/// The ordered flag map for the current state. Empty when no target platform
/// is selected; a build command without a platform is meaningless.
pub fn cli_map(state: &FormState) -> Vec<(&'static str, CliValue)> {
    let Some(platform) = state.selected_platform else {
        return Vec::new();
    };

    let entries = vec![
        ("platform", CliValue::Text(platform.cmd_token().to_string())),
        ("python_app_path", CliValue::Text(state.python_app_path.clone())),
        ("--arch", CliValue::Text(state.arch.clone())),
        ("--output", CliValue::Text(state.output_directory.clone())),
        ("--clear-cache", CliValue::Switch(state.clear_build_cache)),
        ("--template", CliValue::Text(state.template_path.clone())),
        ("--template-dir", CliValue::Text(state.template_dir.clone())),
        ("--template-ref", CliValue::Text(state.template_ref.clone())),
        ("--build-version", CliValue::Text(state.build_version.clone())),
        ("--build-number", CliValue::Text(state.build_number.clone())),
        ("--project", CliValue::Text(state.project_name.clone())),
        ("--product", CliValue::Text(state.product_name.clone())),
        ("--description", CliValue::Text(state.description.clone())),
        ("--org", CliValue::Text(state.organization.clone())),
        ("--splash-color", CliValue::Text(state.splash_screen_color.clone())),
        ("--splash-dark-color", CliValue::Text(state.splash_screen_dark_color.clone())),
        ("--no-web-splash", CliValue::Switch(state.disable_web_splash_screen)),
        ("--no-ios-splash", CliValue::Switch(state.disable_ios_splash_screen)),
        ("--no-android-splash", CliValue::Switch(state.disable_android_splash_screen)),
        ("--exclude", CliValue::Items(state.exclude_additional_files.clone())),
        ("--compile-app", CliValue::Switch(state.compile_app_py_files)),
        ("--compile-packages", CliValue::Switch(state.compile_site_packages_py_files)),
        ("--cleanup-app", CliValue::Switch(state.remove_unnecessary_app_files)),
        ("--cleanup-packages", CliValue::Switch(state.remove_unnecessary_package_files)),
        ("--base-url", CliValue::Text(state.base_url.clone())),
        ("--web-renderer", CliValue::Text(state.web_renderer.clone())),
        ("--use-color-emoji", CliValue::Switch(state.enable_color_emojis)),
        ("--route-url-strategy", CliValue::Text(state.route_url_strategy.clone())),
        ("--pwa-background-color", CliValue::Text(state.pwa_background_color.clone())),
        ("--pwa-theme-color", CliValue::Text(state.pwa_theme_color.clone())),
        ("--ios-team-id", CliValue::Text(state.team_id.clone())),
        ("--ios-export-method", CliValue::Text(state.export_method.clone())),
        ("--ios-signing-certificate", CliValue::Text(state.signing_certificate.clone())),
        ("--ios-provisioning-profile", CliValue::Text(state.provisioning_profile.clone())),
        ("--info-plist", CliValue::Items(state.ios_info_plist.clone())),
        ("--android-meta-data", CliValue::Items(state.android_metadata.clone())),
        ("--android-features", CliValue::Items(state.android_features.clone())),
        ("--android-permissions", CliValue::Items(state.android_permissions.clone())),
        ("--split-per-abi", CliValue::Switch(state.split_apk_per_abi)),
        ("--macos-entitlements", CliValue::Items(state.macos_entitlements.clone())),
        ("--flutter-build-args", CliValue::Items(state.flutter_args.clone())),
        ("--include-packages", CliValue::Items(state.include_optional_controls.clone())),
        (
            "--permissions",
            CliValue::Items(
                state
                    .enabled_permissions()
                    .iter()
                    .map(|p| (*p).to_string())
                    .collect(),
            ),
        ),
    ];

    entries.into_iter().filter(|(_, v)| v.is_set()).collect()
}

/// Renders the full command token list, starting with `flet build`.
pub fn build_command(state: &FormState) -> Vec<String> {
    let mut cmd = vec![BUILD_TOOL.to_string(), BUILD_SUBCOMMAND.to_string()];

    for (key, value) in cli_map(state) {
        match (key, value) {
            // The platform is a bare positional token.
            ("platform", CliValue::Text(token)) => cmd.push(token),
            // The app path is positional too, with `~` expanded at emission.
            ("python_app_path", CliValue::Text(path)) => {
                cmd.push(paths::expand_user(&path).display().to_string());
            }
            (flag, CliValue::Switch(_)) => cmd.push(flag.to_string()),
            (flag, CliValue::Items(items)) => {
                for item in &items {
                    cmd.push(format!("{}={}", flag, quote(item)));
                }
            }
            (flag, CliValue::Text(value)) => cmd.push(format!("{}={}", flag, quote(&value))),
        }
    }

    if !state.module_name.is_empty() {
        cmd.push(format!("--module={}", state.module_name));
    }

    match state.verbose_build_level {
        1 => cmd.push("-v".to_string()),
        2 => cmd.push("-vv".to_string()),
        _ => {}
    }

    cmd
}

fn quote(raw: &str) -> String {
    match shlex::try_quote(raw) {
        Ok(quoted) => quoted.into_owned(),
        Err(_) => {
            log::warn!("Value could not be shell-quoted, passing through: {:?}", raw);
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, Platform};

    #[test]
    fn test_no_platform_yields_bare_command() {
        let state = FormState::new();
        assert!(cli_map(&state).is_empty());
        assert_eq!(build_command(&state), vec!["flet", "build"]);
    }

    #[test]
    fn test_web_build_command_order_and_rendering() {
        let mut state = FormState::new();
        state.update("selected_platform", FieldValue::Platform(Some(Platform::Web)));
        state.update("python_app_path", FieldValue::Text("~/app".to_string()));
        state.update("clear_build_cache", FieldValue::Flag(true));
        state.update(
            "exclude_additional_files",
            FieldValue::Items(vec!["a".to_string(), "b".to_string()]),
        );
        state.update("module_name", FieldValue::Text("main".to_string()));
        state.update("verbose_build_level", FieldValue::Level(2));

        let expected_path = paths::expand_user("~/app").display().to_string();
        assert_eq!(
            build_command(&state),
            vec![
                "flet".to_string(),
                "build".to_string(),
                "web".to_string(),
                expected_path,
                "--clear-cache".to_string(),
                "--build-version=1.0.0".to_string(),
                "--build-number=0".to_string(),
                "--exclude=a".to_string(),
                "--exclude=b".to_string(),
                "--module=main".to_string(),
                "-vv".to_string(),
            ]
        );
    }

    #[test]
    fn test_values_with_spaces_are_quoted() {
        let mut state = FormState::new();
        state.update("selected_platform", FieldValue::Platform(Some(Platform::Linux)));
        state.update("project_name", FieldValue::Text("my app".to_string()));

        let cmd = build_command(&state);
        assert!(cmd.contains(&"--project='my app'".to_string()));
    }

    #[test]
    fn test_permissions_render_as_repeated_flag() {
        let mut state = FormState::new();
        state.update("selected_platform", FieldValue::Platform(Some(Platform::AndroidApk)));
        state.update("permission_camera", FieldValue::Flag(true));
        state.update("permission_location", FieldValue::Flag(true));

        let cmd = build_command(&state);
        let perms: Vec<&String> = cmd.iter().filter(|t| t.starts_with("--permissions=")).collect();
        assert_eq!(perms, vec!["--permissions=location", "--permissions=camera"]);
    }

    #[test]
    fn test_verbosity_levels() {
        let mut state = FormState::new();
        state.update("selected_platform", FieldValue::Platform(Some(Platform::Windows)));

        state.update("verbose_build_level", FieldValue::Level(0));
        assert!(!build_command(&state).iter().any(|t| t == "-v" || t == "-vv"));

        state.update("verbose_build_level", FieldValue::Level(1));
        assert_eq!(build_command(&state).last().map(String::as_str), Some("-v"));

        state.update("verbose_build_level", FieldValue::Level(2));
        assert_eq!(build_command(&state).last().map(String::as_str), Some("-vv"));
    }

    #[test]
    fn test_assembly_does_not_mutate_state() {
        let mut state = FormState::new();
        state.update("selected_platform", FieldValue::Platform(Some(Platform::Macos)));
        let before = state.snapshot();
        let first = build_command(&state);
        let second = build_command(&state);
        assert_eq!(first, second);
        assert_eq!(state.snapshot(), before);
    }
}
