//! Preview device descriptors as reported by the device connection layer.

use serde::{Deserialize, Serialize};

use crate::manifest::DependencyManifest;

/// Platform a preview device runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// Apple iOS.
    #[serde(rename = "iOS")]
    Ios,
    /// Android.
    Android,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Ios => f.write_str("iOS"),
            Platform::Android => f.write_str("Android"),
        }
    }
}

/// A connected preview runtime instance.
///
/// Produced by the device connection layer for every "device manifest
/// received" event; this crate only reads it. The `plugins` field carries
/// the device's dependency manifest in its raw serialized form — that exact
/// string doubles as the change-detection signature for the comparison
/// cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDevice {
    /// Stable device identifier, used as the cache key.
    pub id: String,
    /// Device platform.
    pub platform: Platform,
    /// Device model.
    pub model: String,
    /// Device display name.
    pub name: String,
    /// Operating system version.
    pub os_version: String,
    /// Version of the preview app installed on the device.
    pub preview_app_version: String,
    /// Version of the runtime bundled in the preview app.
    pub runtime_version: String,
    /// Serialized dependency manifest (JSON object of name→version).
    pub plugins: String,
    /// Whether the serialized manifest has already been expanded.
    pub plugins_expanded: bool,
}

impl PreviewDevice {
    /// Start building a device descriptor.
    pub fn builder(id: impl Into<String>, platform: Platform) -> PreviewDeviceBuilder {
        PreviewDeviceBuilder::new(id, platform)
    }

    /// Parse the serialized plugin payload into a manifest.
    ///
    /// An empty or malformed payload yields an empty manifest; the parse
    /// failure is traced, never propagated. Every local plugin will then
    /// be reported as missing on the device, which is the desired outcome
    /// for a device that reported nothing usable.
    pub fn plugin_manifest(&self) -> DependencyManifest {
        if self.plugins.trim().is_empty() {
            return DependencyManifest::new();
        }

        match DependencyManifest::from_json(&self.plugins) {
            Ok(manifest) => manifest,
            Err(err) => {
                tracing::trace!(
                    device = %self.id,
                    "failed to parse plugins payload from device: {err}"
                );
                DependencyManifest::new()
            }
        }
    }

    /// The raw plugin payload, used as the comparison cache signature.
    pub fn manifest_signature(&self) -> &str {
        &self.plugins
    }
}

/// Builder for [`PreviewDevice`].
pub struct PreviewDeviceBuilder {
    device: PreviewDevice,
}

impl PreviewDeviceBuilder {
    /// Create a builder with the required identity fields.
    pub fn new(id: impl Into<String>, platform: Platform) -> Self {
        Self {
            device: PreviewDevice {
                id: id.into(),
                platform,
                model: String::new(),
                name: String::new(),
                os_version: String::new(),
                preview_app_version: String::new(),
                runtime_version: String::new(),
                plugins: String::new(),
                plugins_expanded: false,
            },
        }
    }

    /// Set the device model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.device.model = model.into();
        self
    }

    /// Set the device display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.device.name = name.into();
        self
    }

    /// Set the operating system version.
    pub fn os_version(mut self, version: impl Into<String>) -> Self {
        self.device.os_version = version.into();
        self
    }

    /// Set the preview app version.
    pub fn preview_app_version(mut self, version: impl Into<String>) -> Self {
        self.device.preview_app_version = version.into();
        self
    }

    /// Set the runtime version.
    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.device.runtime_version = version.into();
        self
    }

    /// Set the serialized plugin payload.
    pub fn plugins(mut self, payload: impl Into<String>) -> Self {
        self.device.plugins = payload.into();
        self
    }

    /// Mark the plugin payload as already expanded.
    pub fn plugins_expanded(mut self, expanded: bool) -> Self {
        self.device.plugins_expanded = expanded;
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> PreviewDevice {
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_device(plugins: &str) -> PreviewDevice {
        PreviewDevice::builder("device-1", Platform::Ios)
            .model("test-model")
            .name("test-device")
            .os_version("10.0")
            .preview_app_version("28.0.0")
            .runtime_version("4.3.0")
            .plugins(plugins)
            .build()
    }

    #[test]
    fn test_plugin_manifest_parse() {
        let device = test_device(r#"{"theme":"1.0.4","widgets":"4.2.0"}"#);
        let manifest = device.plugin_manifest();

        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.get("theme"), Some("1.0.4"));
    }

    #[test]
    fn test_plugin_manifest_empty_payload() {
        assert!(test_device("").plugin_manifest().is_empty());
        assert!(test_device("   ").plugin_manifest().is_empty());
        assert!(test_device("{}").plugin_manifest().is_empty());
    }

    #[test]
    fn test_plugin_manifest_malformed_payload() {
        let device = test_device("not json at all");
        assert!(device.plugin_manifest().is_empty());
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "id": "device-1",
            "platform": "iOS",
            "model": "test-model",
            "name": "test-device",
            "osVersion": "10.0",
            "previewAppVersion": "28.0.0",
            "runtimeVersion": "4.3.0",
            "plugins": "{}",
            "pluginsExpanded": false
        }"#;

        let device: PreviewDevice = serde_json::from_str(json).unwrap();
        assert_eq!(device.id, "device-1");
        assert_eq!(device.platform, Platform::Ios);
        assert_eq!(device.os_version, "10.0");
        assert!(!device.plugins_expanded);
    }
}
