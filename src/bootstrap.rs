//! Wiring between the module registry and the HTTP server.

use anyhow::Context;
use folio_kernel::{InitCtx, ModuleRegistry, Settings};

use crate::modules;

/// Registry holding every application module
pub fn build_registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry).context("failed to register modules")?;
    Ok(registry)
}

/// Run the service until shutdown: init and start modules, serve HTTP,
/// then stop modules in reverse order.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry()?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;
    tracing::info!(modules = registry.len(), "folio bootstrap complete");

    let served = folio_http::start_server(&registry, &settings).await;

    // Modules are stopped even when the server exits with an error.
    let stopped = registry.stop_all().await;
    served?;
    stopped
}

/// The generated OpenAPI document as pretty-printed JSON
pub fn openapi_json(settings: &Settings) -> anyhow::Result<String> {
    let registry = build_registry()?;
    let document = folio_http::openapi_document(&registry, settings);
    document
        .to_pretty_json()
        .context("failed to serialize OpenAPI document")
}
