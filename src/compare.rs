//! Manifest comparison and the drift warning taxonomy.

use std::fmt;

use crate::manifest::{DependencyManifest, PluginVersion};

/// A classified plugin drift warning.
///
/// Raw version strings are carried verbatim, range prefixes included, so
/// the rendered message shows exactly what each side declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginWarning {
    /// A local plugin is absent from the device's preview app.
    MissingOnDevice {
        /// Plugin name.
        plugin: String,
        /// Identifier of the device that lacks the plugin.
        device_id: String,
    },
    /// Local and device plugin disagree on major version.
    MajorVersionMismatch {
        /// Plugin name.
        plugin: String,
        /// Version declared in the local project manifest.
        local_version: String,
        /// Version reported by the device.
        device_version: String,
    },
    /// Local plugin is ahead of the device on minor version.
    LocalMinorAhead {
        /// Plugin name.
        plugin: String,
        /// Version declared in the local project manifest.
        local_version: String,
        /// Version reported by the device.
        device_version: String,
    },
}

impl PluginWarning {
    /// Name of the plugin this warning refers to.
    pub fn plugin(&self) -> &str {
        match self {
            Self::MissingOnDevice { plugin, .. }
            | Self::MajorVersionMismatch { plugin, .. }
            | Self::LocalMinorAhead { plugin, .. } => plugin,
        }
    }
}

impl fmt::Display for PluginWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOnDevice { plugin, device_id } => write!(
                f,
                "Plugin {plugin} is not included in the preview app on device {device_id} and will not work."
            ),
            Self::MajorVersionMismatch {
                plugin,
                local_version,
                device_version,
            } => write!(
                f,
                "Local plugin {plugin} differs in major version from the plugin in the preview app. \
                 The local plugin has version {local_version} and the preview app has version {device_version}. \
                 Some features might not work as expected."
            ),
            Self::LocalMinorAhead {
                plugin,
                local_version,
                device_version,
            } => write!(
                f,
                "Local plugin {plugin} differs in minor version from the plugin in the preview app. \
                 The local plugin has version {local_version} and the preview app has version {device_version}. \
                 Some features might not work as expected."
            ),
        }
    }
}

/// Compare the local manifest against a device's manifest.
///
/// Pure and deterministic: warnings come out in the order plugins appear
/// in `local`. Each local plugin produces at most one warning. Plugins
/// present only on the device are never reported; the device bundling
/// more than the project uses is not drift.
pub fn compare_manifests(
    local: &DependencyManifest,
    device: &DependencyManifest,
    device_id: &str,
) -> Vec<PluginWarning> {
    let mut warnings = Vec::new();

    for (plugin, local_version) in local.iter() {
        let Some(device_version) = device.get(plugin) else {
            warnings.push(PluginWarning::MissingOnDevice {
                plugin: plugin.to_string(),
                device_id: device_id.to_string(),
            });
            continue;
        };

        let local_parsed = PluginVersion::parse(local_version);
        let device_parsed = PluginVersion::parse(device_version);

        if local_parsed.major != device_parsed.major {
            warnings.push(PluginWarning::MajorVersionMismatch {
                plugin: plugin.to_string(),
                local_version: local_version.to_string(),
                device_version: device_version.to_string(),
            });
        } else if local_parsed.minor > device_parsed.minor {
            warnings.push(PluginWarning::LocalMinorAhead {
                plugin: plugin.to_string(),
                local_version: local_version.to_string(),
                device_version: device_version.to_string(),
            });
        }
        // Patch differences and a device that is minor-ahead are silent.
    }

    warnings
}
