//! External-plugin extraction from a device manifest.

use crate::manifest::DependencyManifest;

/// First-party packages that are always bundled in the preview app and
/// therefore never resolved externally.
pub const EXCLUDED_PLUGINS: [&str; 4] = [
    "nativescript-theme-core",
    "nativescript-intl",
    "nativescript-vue",
    "nativescript-angular",
];

/// Substring marking a package as part of the plugin ecosystem. Names
/// without it are generic libraries handled by the standard package
/// mechanism, not by the preview runtime.
pub const PLUGIN_NAME_MARKER: &str = "nativescript";

/// Core module packages the runtime always needs, appended to every
/// extraction result in this order.
pub const CORE_MODULE_PLUGINS: [&str; 2] = ["tns-core-modules", "tns-core-modules-widgets"];

/// Derive the plugins a device must resolve bundles for.
///
/// Keeps device-reported names that carry the ecosystem marker and are not
/// on the bundled-first-party exclusion list, in discovery order, then
/// appends the core module packages. The result is de-duplicated by first
/// occurrence.
pub fn external_plugins(device: &DependencyManifest) -> Vec<String> {
    let mut plugins: Vec<String> = device
        .names()
        .filter(|name| !EXCLUDED_PLUGINS.contains(name))
        .filter(|name| name.contains(PLUGIN_NAME_MARKER))
        .map(str::to_string)
        .collect();

    for core in CORE_MODULE_PLUGINS {
        if !plugins.iter().any(|p| p == core) {
            plugins.push(core.to_string());
        }
    }

    plugins
}
