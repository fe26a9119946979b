//! Compare a project's plugins against a simulated preview device.
//!
//! Run with: cargo run --example compare_device

use std::sync::Arc;

use preview_plugin_sync::{
    FsManifestReader, Platform, PreviewDevice, PreviewPluginsService, ProjectContext, TracingSink,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // A throwaway project with a couple of plugin dependencies.
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "demo-app",
            "dependencies": {
                "nativescript-facebook": "2.2.3",
                "nativescript-theme-core": "~1.0.4",
                "tns-core-modules": "~4.2.0"
            }
        }"#,
    )?;

    let service = PreviewPluginsService::new(
        Arc::new(FsManifestReader),
        Arc::new(TracingSink),
        ProjectContext::new(dir.path()),
    );

    // What a device connection event would deliver: the preview app lacks
    // nativescript-facebook and bundles a newer theme package.
    let device = PreviewDevice::builder("demo-device", Platform::Ios)
        .model("simulator")
        .name("Demo Simulator")
        .os_version("17.0")
        .preview_app_version("28.0.0")
        .runtime_version("4.3.0")
        .plugins(r#"{"nativescript-theme-core":"2.0.4","tns-core-modules":"4.2.0"}"#)
        .build();

    service.compare_plugins_on_device(&device)?;

    // A second event with the same payload is skipped by the cache.
    service.compare_plugins_on_device(&device)?;

    println!("external plugins: {:?}", service.external_plugins(&device));
    Ok(())
}
