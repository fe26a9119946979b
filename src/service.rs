//! Orchestration: cache check, manifest load, comparison, warning delivery.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;

use crate::cache::ComparisonCache;
use crate::compare::compare_manifests;
use crate::device::PreviewDevice;
use crate::error::{Error, Result};
use crate::external::external_plugins;
use crate::manifest::DependencyManifest;

/// Loads the local project's dependency manifest.
///
/// The only potentially blocking collaborator. A failure aborts the
/// comparison call; the service emits no warnings and leaves the cache
/// untouched so the next device event retries.
pub trait ManifestReader: Send + Sync {
    /// Read the manifest at `path`.
    fn read(&self, path: &Path) -> Result<DependencyManifest>;
}

/// Receives rendered warnings and diagnostics. Fire-and-forget.
pub trait WarningSink: Send + Sync {
    /// Deliver a warning message.
    fn warn(&self, message: &str);
    /// Deliver a diagnostic message.
    fn trace(&self, message: &str);
}

/// Reads `package.json` from disk and extracts its `dependencies` section.
#[derive(Debug, Default)]
pub struct FsManifestReader;

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: DependencyManifest,
}

impl ManifestReader for FsManifestReader {
    fn read(&self, path: &Path) -> Result<DependencyManifest> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::manifest_read(path, e))?;
        let package: PackageJson = serde_json::from_str(&content)
            .map_err(|e| Error::manifest_parse(path, e.to_string()))?;
        Ok(package.dependencies)
    }
}

/// Forwards messages to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn trace(&self, message: &str) {
        tracing::trace!("{message}");
    }
}

/// Buffers messages in memory.
///
/// For tests and embedders that render warnings through their own UI
/// instead of a log stream.
#[derive(Debug, Default)]
pub struct MemorySink {
    warnings: Mutex<Vec<String>>,
    traces: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings delivered so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    /// Diagnostics delivered so far.
    pub fn traces(&self) -> Vec<String> {
        self.traces.lock().clone()
    }

    /// Discard all buffered messages.
    pub fn clear(&self) {
        self.warnings.lock().clear();
        self.traces.lock().clear();
    }
}

impl WarningSink for MemorySink {
    fn warn(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }

    fn trace(&self, message: &str) {
        self.traces.lock().push(message.to_string());
    }
}

/// Local project configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Root directory of the local project.
    pub project_dir: PathBuf,
}

impl ProjectContext {
    /// Create a context for a project root.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    /// Path of the project's package descriptor.
    pub fn package_json_path(&self) -> PathBuf {
        self.project_dir.join("package.json")
    }
}

/// Reconciles local project plugins with the set bundled in a device's
/// preview app.
///
/// Owns its [`ComparisonCache`]; every service instance is fully isolated.
/// Methods take `&self` and internal state is safe under same-key races,
/// but callers are expected to serialize events per device identifier —
/// one in-flight comparison per device at a time.
pub struct PreviewPluginsService {
    reader: Arc<dyn ManifestReader>,
    sink: Arc<dyn WarningSink>,
    project: ProjectContext,
    cache: ComparisonCache,
}

impl PreviewPluginsService {
    /// Create a service with explicit collaborators.
    pub fn new(
        reader: Arc<dyn ManifestReader>,
        sink: Arc<dyn WarningSink>,
        project: ProjectContext,
    ) -> Self {
        Self {
            reader,
            sink,
            project,
            cache: ComparisonCache::new(),
        }
    }

    /// Create a service reading `package.json` from disk and warning via
    /// `tracing`.
    pub fn with_defaults(project: ProjectContext) -> Self {
        Self::new(
            Arc::new(FsManifestReader),
            Arc::new(TracingSink),
            project,
        )
    }

    /// The project context this service compares against.
    pub fn project(&self) -> &ProjectContext {
        &self.project
    }

    /// The per-device comparison cache.
    ///
    /// Exposed so the device connection layer can apply its eviction
    /// policy, e.g. [`ComparisonCache::remove`] on disconnect.
    pub fn cache(&self) -> &ComparisonCache {
        &self.cache
    }

    /// Compare local plugins against a device's preview app and warn about
    /// drift.
    ///
    /// A no-op when the device's manifest signature is unchanged since the
    /// last comparison for that device. On a manifest read failure the
    /// error propagates, no warnings are emitted, and the cache is left
    /// untouched so the next event retries.
    pub fn compare_plugins_on_device(&self, device: &PreviewDevice) -> Result<()> {
        let signature = device.manifest_signature();
        if !self.cache.should_compare(&device.id, signature) {
            self.sink.trace(&format!(
                "Plugins for device {} are unchanged, skipping comparison.",
                device.id
            ));
            return Ok(());
        }

        let local = self.reader.read(&self.project.package_json_path())?;
        let device_manifest = device.plugin_manifest();

        let warnings = compare_manifests(&local, &device_manifest, &device.id);
        self.sink.trace(&format!(
            "Compared {} local plugins against device {}: {} warning(s).",
            local.len(),
            device.id,
            warnings.len()
        ));
        for warning in &warnings {
            self.sink.warn(&warning.to_string());
        }

        self.cache.mark_compared(&device.id, signature);
        Ok(())
    }

    /// Plugins the device must resolve bundles for.
    ///
    /// Never fails: an unreadable device payload counts as an empty
    /// manifest, leaving only the core module packages.
    pub fn external_plugins(&self, device: &PreviewDevice) -> Vec<String> {
        external_plugins(&device.plugin_manifest())
    }
}

impl std::fmt::Debug for PreviewPluginsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewPluginsService")
            .field("project", &self.project)
            .field("cached_devices", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::device::Platform;

    /// Serves a fixed manifest and counts reads.
    struct StubReader {
        manifest: DependencyManifest,
        reads: AtomicUsize,
    }

    impl StubReader {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                manifest: entries.iter().copied().collect(),
                reads: AtomicUsize::new(0),
            }
        }

        fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ManifestReader for StubReader {
        fn read(&self, _path: &Path) -> Result<DependencyManifest> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.manifest.clone())
        }
    }

    /// Always fails, counting attempts.
    struct FailingReader {
        reads: AtomicUsize,
    }

    impl ManifestReader for FailingReader {
        fn read(&self, path: &Path) -> Result<DependencyManifest> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Err(Error::manifest_parse(path, "stub failure"))
        }
    }

    fn device(id: &str, plugins: &str) -> PreviewDevice {
        PreviewDevice::builder(id, Platform::Ios)
            .model("test-model")
            .name("test-device")
            .os_version("10.0")
            .preview_app_version("28.0.0")
            .runtime_version("4.3.0")
            .plugins(plugins)
            .build()
    }

    fn service(reader: Arc<dyn ManifestReader>) -> (PreviewPluginsService, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let service = PreviewPluginsService::new(
            reader,
            sink.clone(),
            ProjectContext::new("test-project-dir"),
        );
        (service, sink)
    }

    #[test]
    fn test_warnings_forwarded_to_sink() {
        let reader = Arc::new(StubReader::new(&[
            ("nativescript-facebook", "2.2.3"),
            ("nativescript-theme-core", "1.0.4"),
        ]));
        let (service, sink) = service(reader);

        service
            .compare_plugins_on_device(&device(
                "device-1",
                r#"{"nativescript-theme-core":"2.0.4"}"#,
            ))
            .unwrap();

        assert_eq!(
            sink.warnings(),
            vec![
                "Plugin nativescript-facebook is not included in the preview app on device device-1 and will not work.".to_string(),
                "Local plugin nativescript-theme-core differs in major version from the plugin in the preview app. \
                 The local plugin has version 1.0.4 and the preview app has version 2.0.4. \
                 Some features might not work as expected.".to_string(),
            ]
        );
    }

    #[test]
    fn test_unchanged_signature_is_noop() {
        let reader = Arc::new(StubReader::new(&[("nativescript-facebook", "2.2.3")]));
        let (service, sink) = service(reader.clone());
        let dev = device("device-1", "{}");

        service.compare_plugins_on_device(&dev).unwrap();
        assert_eq!(reader.read_count(), 1);
        assert_eq!(sink.warnings().len(), 1);

        service.compare_plugins_on_device(&dev).unwrap();
        service.compare_plugins_on_device(&dev).unwrap();

        // No further reads, no further warnings.
        assert_eq!(reader.read_count(), 1);
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_changed_signature_recompares() {
        let reader = Arc::new(StubReader::new(&[("nativescript-facebook", "2.2.3")]));
        let (service, sink) = service(reader.clone());

        service
            .compare_plugins_on_device(&device("device-1", "{}"))
            .unwrap();
        service
            .compare_plugins_on_device(&device(
                "device-1",
                r#"{"nativescript-facebook":"2.2.3"}"#,
            ))
            .unwrap();

        assert_eq!(reader.read_count(), 2);
        // First pass warned, second found the plugin present.
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_devices_cached_independently() {
        let reader = Arc::new(StubReader::new(&[("nativescript-facebook", "2.2.3")]));
        let (service, _sink) = service(reader.clone());

        service
            .compare_plugins_on_device(&device("device-1", "{}"))
            .unwrap();
        service
            .compare_plugins_on_device(&device("device-2", "{}"))
            .unwrap();

        assert_eq!(reader.read_count(), 2);
        assert_eq!(service.cache().len(), 2);
    }

    #[test]
    fn test_read_failure_propagates_and_retries() {
        let reader = Arc::new(FailingReader {
            reads: AtomicUsize::new(0),
        });
        let sink = Arc::new(MemorySink::new());
        let service = PreviewPluginsService::new(
            reader.clone(),
            sink.clone(),
            ProjectContext::new("test-project-dir"),
        );
        let dev = device("device-1", "{}");

        assert!(service.compare_plugins_on_device(&dev).is_err());
        assert!(sink.warnings().is_empty());
        assert!(service.cache().is_empty());

        // The failed call did not poison the cache; the next event retries.
        assert!(service.compare_plugins_on_device(&dev).is_err());
        assert_eq!(reader.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_external_plugins_via_device_payload() {
        let reader = Arc::new(StubReader::new(&[]));
        let (service, _sink) = service(reader);

        let plugins = service.external_plugins(&device(
            "device-1",
            r#"{"nativescript-facebook":"4.5.6","lodash":"4.5.6"}"#,
        ));
        assert_eq!(
            plugins,
            vec![
                "nativescript-facebook",
                "tns-core-modules",
                "tns-core-modules-widgets"
            ]
        );

        // Malformed payload degrades to the core module pair.
        let plugins = service.external_plugins(&device("device-1", "not json"));
        assert_eq!(plugins, vec!["tns-core-modules", "tns-core-modules-widgets"]);
    }

    #[test]
    fn test_fs_reader_reads_dependencies_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(
            &path,
            r#"{
                "name": "demo-app",
                "dependencies": {
                    "nativescript-theme-core": "~1.0.4",
                    "tns-core-modules": "~4.2.0"
                },
                "devDependencies": { "typescript": "~2.7.2" }
            }"#,
        )
        .unwrap();

        let manifest = FsManifestReader.read(&path).unwrap();
        let names: Vec<&str> = manifest.names().collect();
        assert_eq!(names, vec!["nativescript-theme-core", "tns-core-modules"]);
    }

    #[test]
    fn test_fs_reader_missing_dependencies_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{"name":"demo-app"}"#).unwrap();

        assert!(FsManifestReader.read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_fs_reader_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("package.json");
        assert!(matches!(
            FsManifestReader.read(&missing),
            Err(Error::ManifestRead { .. })
        ));

        std::fs::write(&missing, "not json").unwrap();
        assert!(matches!(
            FsManifestReader.read(&missing),
            Err(Error::ManifestParse { .. })
        ));
    }
}
