//! # preview-plugin-sync
//!
//! Plugin-manifest reconciliation between a local project and the preview
//! app running on a connected device.
//!
//! This crate provides:
//! - **Manifest Comparison** - Warn about plugins missing from the device,
//!   major version mismatches, and locally-ahead minor versions
//! - **External Plugin Resolution** - Derive which plugins a device must
//!   resolve bundles for, from its reported manifest
//! - **Per-Device Caching** - Skip repeated comparisons until a device's
//!   reported manifest actually changes
//! - **Pluggable Collaborators** - Manifest reading and warning delivery
//!   behind traits, with filesystem and `tracing` defaults
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use preview_plugin_sync::{PreviewPluginsService, ProjectContext};
//!
//! let service = PreviewPluginsService::with_defaults(
//!     ProjectContext::new("/path/to/project"),
//! );
//!
//! // On every "device manifest received" event:
//! service.compare_plugins_on_device(&device)?;
//! let external = service.external_plugins(&device);
//! ```
//!
//! The comparison and extraction algorithms ([`compare_manifests`],
//! [`external_plugins`]) are pure functions and can be used directly
//! without the service wrapper.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod cache;
mod compare;
mod device;
mod error;
mod external;
mod manifest;
pub mod service;

pub use cache::ComparisonCache;
pub use compare::{compare_manifests, PluginWarning};
pub use device::{Platform, PreviewDevice, PreviewDeviceBuilder};
pub use error::{Error, Result};
pub use external::{
    external_plugins, CORE_MODULE_PLUGINS, EXCLUDED_PLUGINS, PLUGIN_NAME_MARKER,
};
pub use manifest::{DependencyManifest, PluginVersion};
pub use service::{
    FsManifestReader, ManifestReader, MemorySink, PreviewPluginsService, ProjectContext,
    TracingSink, WarningSink,
};

/// Crate version for compatibility checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
