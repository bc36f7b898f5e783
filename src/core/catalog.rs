// src/core/catalog.rs
//
// The static field catalog: every configurable option, grouped the way the
// form cards group them. Pure data; the UI layer renders it, the populator
// and tests consume it.

use crate::models::{DropdownOption, FieldDefinition, WidgetKind};

const NO_OPTIONS: &[DropdownOption] = &[];

macro_rules! field {
    ($name:literal, $property:literal, $title:literal, $hint:literal, $widget:expr) => {
        FieldDefinition {
            name: $name,
            property: $property,
            title: $title,
            hint: $hint,
            widget: $widget,
            options: NO_OPTIONS,
        }
    };
    ($name:literal, $property:literal, $title:literal, $hint:literal, $widget:expr, $options:expr) => {
        FieldDefinition {
            name: $name,
            property: $property,
            title: $title,
            hint: $hint,
            widget: $widget,
            options: $options,
        }
    };
}

pub const BUILDING_FIELDS: &[FieldDefinition] = &[
    field!(
        "python_app_path",
        "python_app_path",
        "Python App Path",
        "Path to a directory with the flet project",
        WidgetKind::Text
    ),
    field!(
        "output_directory",
        "output_directory",
        "Output directory",
        "Where to put resulting executable or bundle",
        WidgetKind::Text
    ),
    field!(
        "module_path",
        "app_path",
        "Module path",
        "Path to a directory with the app entry module",
        WidgetKind::Text
    ),
    field!(
        "module_name",
        "module_name",
        "Module name",
        "Python module name with an app entry point",
        WidgetKind::Text
    ),
    field!(
        "architecture",
        "arch",
        "Architecture",
        "Package for specific architectures only. Used with Android and macOS builds only.",
        WidgetKind::Dropdown,
        &[
            DropdownOption { key: "arm64", label: "arm64" },
            DropdownOption { key: "x86_64", label: "x86_64" },
        ]
    ),
    field!(
        "flutter_args",
        "flutter_args",
        "Flutter args",
        "Additional arguments for flutter build command",
        WidgetKind::Badges
    ),
    field!(
        "clear_build_cache",
        "clear_build_cache",
        "Clear build cache",
        "",
        WidgetKind::Checkbox
    ),
];

pub const APP_INFO_FIELDS: &[FieldDefinition] = &[
    field!(
        "project_name",
        "project_name",
        "Project name",
        "Project name for executable or bundle",
        WidgetKind::Text
    ),
    field!(
        "product_name",
        "product_name",
        "Product name",
        "Display name shown in window titles and about dialogs",
        WidgetKind::Text
    ),
    field!(
        "description",
        "description",
        "Description",
        "The description to use for executable or bundle",
        WidgetKind::Text
    ),
    field!(
        "organization",
        "organization",
        "Organization",
        "Org name in reverse domain name notation",
        WidgetKind::Text
    ),
    field!(
        "author",
        "author",
        "Author",
        "Author information for the project",
        WidgetKind::Author
    ),
];

pub const VERSIONING_FIELDS: &[FieldDefinition] = &[
    field!(
        "build_number",
        "build_number",
        "Build number",
        "Identifier used as an internal version number",
        WidgetKind::Text
    ),
    field!(
        "build_version",
        "build_version",
        "Build version",
        "A \"x.y.z\" string shown to users",
        WidgetKind::Text
    ),
];

pub const APPEARANCE_FIELDS: &[FieldDefinition] = &[
    field!(
        "splash_screen_color",
        "splash_screen_color",
        "Splash Screen Color",
        "Background color of splash screen",
        WidgetKind::Text
    ),
    field!(
        "splash_screen_dark_color",
        "splash_screen_dark_color",
        "Splash Screen Dark Color",
        "Background color in dark mode",
        WidgetKind::Text
    ),
    field!(
        "disable_web_splash",
        "disable_web_splash_screen",
        "Disable web splash screen",
        "",
        WidgetKind::Checkbox
    ),
    field!(
        "disable_ios_splash",
        "disable_ios_splash_screen",
        "Disable iOS splash screen",
        "",
        WidgetKind::Checkbox
    ),
    field!(
        "disable_android_splash",
        "disable_android_splash_screen",
        "Disable Android splash screen",
        "",
        WidgetKind::Checkbox
    ),
    field!(
        "app_icon",
        "app_icon",
        "App Icon",
        "Icon for all platforms (png, jpg, webp)",
        WidgetKind::Icon
    ),
];

pub const PACKAGE_OPTIONS_FIELDS: &[FieldDefinition] = &[
    field!(
        "include_controls",
        "include_optional_controls",
        "Include Optional Controls",
        "Add Flutter packages with optional Flet controls",
        WidgetKind::Badges
    ),
    field!(
        "exclude_files",
        "exclude_additional_files",
        "Exclude Additional Files",
        "Exclude files and directories from Python app package",
        WidgetKind::Badges
    ),
    // The composite drives template_dir and template_ref as well; its primary
    // binding is the repository/path sub-field.
    field!(
        "template_config",
        "template_path",
        "Template",
        "Configure custom template for Flutter project generation",
        WidgetKind::Composite
    ),
    field!(
        "compile_app_py",
        "compile_app_py_files",
        "Compile app's .py files to .pyc",
        "",
        WidgetKind::Checkbox
    ),
    field!(
        "compile_site_packages",
        "compile_site_packages_py_files",
        "Compile site packages' .py files to .pyc",
        "",
        WidgetKind::Checkbox
    ),
    field!(
        "remove_app_files",
        "remove_unnecessary_app_files",
        "Remove unnecessary app files",
        "",
        WidgetKind::Checkbox
    ),
    field!(
        "remove_package_files",
        "remove_unnecessary_package_files",
        "Remove unnecessary package files",
        "",
        WidgetKind::Checkbox
    ),
];

pub const WEB_FIELDS: &[FieldDefinition] = &[
    field!(
        "base_url",
        "base_url",
        "Base URL",
        "Base URL for the app",
        WidgetKind::Text
    ),
    field!(
        "web_renderer",
        "web_renderer",
        "Web Renderer",
        "Renderer to use",
        WidgetKind::Dropdown,
        &[
            DropdownOption { key: "canvaskit", label: "CanvasKit" },
            DropdownOption { key: "html", label: "HTML" },
        ]
    ),
    field!(
        "url_strategy",
        "route_url_strategy",
        "Route URL Strategy",
        "URL routing strategy",
        WidgetKind::Dropdown,
        &[
            DropdownOption { key: "path", label: "Path" },
            DropdownOption { key: "hash", label: "Hash" },
        ]
    ),
    field!(
        "pwa_bg_color",
        "pwa_background_color",
        "PWA Background color",
        "Initial background color for your web application",
        WidgetKind::Text
    ),
    field!(
        "pwa_theme_color",
        "pwa_theme_color",
        "PWA Theme color",
        "Default color for your web application's user interface",
        WidgetKind::Text
    ),
    field!(
        "enable_color_emojis",
        "enable_color_emojis",
        "Enable color emojis with CanvasKit",
        "",
        WidgetKind::Checkbox
    ),
];

pub const IOS_FIELDS: &[FieldDefinition] = &[
    field!(
        "team_id",
        "team_id",
        "Team ID",
        "Team ID to sign iOS bundle (10 characters)",
        WidgetKind::Text
    ),
    field!(
        "export_method",
        "export_method",
        "Export Method",
        "Export method for iOS app",
        WidgetKind::Dropdown,
        &[
            DropdownOption { key: "debugging", label: "Debugging" },
            DropdownOption { key: "release-testing", label: "Release-Testing" },
            DropdownOption { key: "app-store-connect", label: "App Store" },
            DropdownOption { key: "enterprise", label: "Enterprise" },
        ]
    ),
    field!(
        "signing_certificate",
        "signing_certificate",
        "Signing Certificate",
        "Certificate name, SHA-1 hash, or automatic selector to use for signing iOS app bundle",
        WidgetKind::Text
    ),
    field!(
        "provisioning_profile",
        "provisioning_profile",
        "Provisioning Profile",
        "Provisioning profile name or UUID that used to sign and export iOS app",
        WidgetKind::Text
    ),
    field!(
        "ios_info_plist",
        "ios_info_plist",
        "Info plist",
        "The list of \"<key>=<value>|True|False\" pairs to add to Info.plist",
        WidgetKind::Badges
    ),
    field!(
        "ios_deep_linking_scheme",
        "ios_deep_linking_scheme",
        "Deep Linking Scheme",
        "Deep linking URL scheme to configure for iOS and Android builds",
        WidgetKind::Text
    ),
    field!(
        "ios_deep_linking_host",
        "ios_deep_linking_host",
        "Deep Linking Host",
        "Deep linking URL host for iOS and Android builds",
        WidgetKind::Text
    ),
];

pub const ANDROID_FIELDS: &[FieldDefinition] = &[
    field!(
        "android_metadata",
        "android_metadata",
        "Android metadata",
        "The list of \"<name>=<value>\" app meta-data entries to add to AndroidManifest.xml",
        WidgetKind::Badges
    ),
    field!(
        "android_features",
        "android_features",
        "Android features",
        "The list of \"<feature_name>=True|False\" features to add to AndroidManifest.xml",
        WidgetKind::Badges
    ),
    field!(
        "android_permissions",
        "android_permissions",
        "Android Permissions",
        "The list of \"<uses-permission android:name='...'/>\" permissions to add to AndroidManifest.xml",
        WidgetKind::Badges
    ),
    field!(
        "android_key_store",
        "android_key_store",
        "Android Signing Key Store",
        "Path to an upload keystore .jks file",
        WidgetKind::Text
    ),
    field!(
        "android_key_store_password",
        "android_key_store_password",
        "Android Signing Key Store Password",
        "Android signing key store password",
        WidgetKind::Text
    ),
    field!(
        "android_key_password",
        "android_key_password",
        "Android Signing Key Password",
        "Android signing key password",
        WidgetKind::Text
    ),
    field!(
        "android_key_alias",
        "android_key_alias",
        "Android Signing Key Alias",
        "Android signing key alias. Default is \"upload\"",
        WidgetKind::Text
    ),
    field!(
        "android_deep_linking_scheme",
        "android_deep_linking_scheme",
        "Deep Linking Scheme",
        "Deep linking URL scheme to configure for iOS and Android builds",
        WidgetKind::Text
    ),
    field!(
        "android_deep_linking_host",
        "android_deep_linking_host",
        "Deep Linking Host",
        "Deep linking URL host for iOS and Android builds",
        WidgetKind::Text
    ),
    field!(
        "split_apk_per_abi",
        "split_apk_per_abi",
        "Split APK per ABIs",
        "",
        WidgetKind::Checkbox
    ),
];

pub const MACOS_FIELDS: &[FieldDefinition] = &[
    field!(
        "macos_entitlements",
        "macos_entitlements",
        "Entitlements",
        "The list of \"<key>=<value>|True|False\" entitlements for macOS builds",
        WidgetKind::Badges
    ),
    field!(
        "macos_info_plist",
        "macos_info_plist",
        "Info plist",
        "The list of \"<key>=<value>|True|False\" pairs to add to Info.plist",
        WidgetKind::Badges
    ),
];

pub const PERMISSIONS_FIELDS: &[FieldDefinition] = &[
    field!("location_permission", "permission_location", "Location", "", WidgetKind::Checkbox),
    field!("camera_permission", "permission_camera", "Camera", "", WidgetKind::Checkbox),
    field!(
        "microphone_permission",
        "permission_microphone",
        "Microphone",
        "",
        WidgetKind::Checkbox
    ),
    field!(
        "photo_library_permission",
        "permission_photo_library",
        "Photo Library",
        "",
        WidgetKind::Checkbox
    ),
];

/// All catalog groups in presentation order, with the card title each group is
/// rendered under.
pub const GROUPS: &[(&str, &[FieldDefinition])] = &[
    ("Building configuration", BUILDING_FIELDS),
    ("App informations", APP_INFO_FIELDS),
    ("Versioning", VERSIONING_FIELDS),
    ("Appearance", APPEARANCE_FIELDS),
    ("Package options", PACKAGE_OPTIONS_FIELDS),
    ("Web specific options", WEB_FIELDS),
    ("iOS specific options", IOS_FIELDS),
    ("Android specific options", ANDROID_FIELDS),
    ("macOS specific options", MACOS_FIELDS),
    ("Permissions", PERMISSIONS_FIELDS),
];

/// Iterator over every field definition in the catalog.
pub fn all_fields() -> impl Iterator<Item = &'static FieldDefinition> {
    GROUPS.iter().flat_map(|(_, fields)| fields.iter())
}
