//! Dependency manifests and lenient plugin version parsing.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Numeric plugin version triple.
///
/// Parsing is lenient by design: version requirements coming out of a
/// project manifest routinely carry range prefixes ("~1.0.4", "^4.2.0")
/// and may omit components. Anything that cannot be read as a number is
/// treated as 0 so that comparison never fails on malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PluginVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl PluginVersion {
    /// Create a new plugin version.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Parse a version string, never failing.
    ///
    /// Range prefixes (`~`, `^`, `>`, `=`, `v`, whitespace) are stripped;
    /// missing or non-numeric components default to 0.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim_start_matches(|c: char| {
            matches!(c, '~' | '^' | '>' | '<' | '=' | 'v') || c.is_whitespace()
        });

        let mut parts = trimmed.split('.');
        let mut component = || {
            parts
                .next()
                .and_then(|p| p.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };

        let major = component();
        let minor = component();
        let patch = component();
        Self { major, minor, patch }
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Mapping from plugin name to version string, in document order.
///
/// Backed by a vector of pairs rather than a hash map so that iteration
/// follows the order plugins appear in the source JSON. Warning output
/// ordering depends on this. Lookups are linear; manifests hold tens of
/// entries at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManifest {
    entries: Vec<(String, String)>,
}

impl DependencyManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest from a JSON object of name→version.
    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    /// Serialize to a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Insert a plugin, replacing any existing version for the same name.
    ///
    /// A replaced entry keeps its original position, matching JSON object
    /// semantics where the last value for a duplicated key wins.
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        let name = name.into();
        let version = version.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = version,
            None => self.entries.push((name, version)),
        }
    }

    /// Get the version string for a plugin.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a plugin is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Iterate over (name, version) pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Iterate over plugin names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of plugins in the manifest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the manifest is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for DependencyManifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut manifest = Self::new();
        for (name, version) in iter {
            manifest.insert(name, version);
        }
        manifest
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for DependencyManifest {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }
}

impl Serialize for DependencyManifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, version) in &self.entries {
            map.serialize_entry(name, version)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DependencyManifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = DependencyManifest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of plugin name to version string")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut manifest = DependencyManifest::new();
                while let Some((name, version)) = access.next_entry::<String, String>()? {
                    manifest.insert(name, version);
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}
