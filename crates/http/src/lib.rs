//! HTTP server facade for Folio with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::Router;
use tokio::signal;
use utoipa::openapi::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use folio_kernel::{ModuleRegistry, Settings};

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server and serve until Ctrl-C or SIGTERM.
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let app = build_router(registry, settings);

    let address = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {}", address))?;

    let public_url = settings.server.public_url();
    tracing::info!(address = %address, "Server running on {}", public_url);
    tracing::info!(
        "Swagger UI: {}{}/",
        public_url,
        settings.docs.swagger_ui_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let prefix = settings.server.api_prefix.as_str();
    let (server_routes, server_api) = server_routes();

    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .merge(server_routes);

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            prefix = if prefix.is_empty() { "/" } else { prefix },
            "mounting module routes"
        );
        router_builder = router_builder.mount_module(prefix, module.routes());
    }

    router_builder
        .with_openapi(openapi(registry, settings, server_api), &settings.docs)
        .build()
}

/// The complete OpenAPI document for the given modules, without serving it
pub fn openapi_document(registry: &ModuleRegistry, settings: &Settings) -> OpenApi {
    let (_, server_api) = server_routes();
    openapi(registry, settings, server_api)
}

fn openapi(registry: &ModuleRegistry, settings: &Settings, server_api: OpenApi) -> OpenApi {
    router::build_openapi(registry, settings, server_api)
}

fn server_routes() -> (Router, OpenApi) {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .split_for_parts()
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = String, content_type = "text/plain"))
)]
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt as _;

    #[tokio::test]
    async fn healthz_answers_ok() {
        let router = build_router(&ModuleRegistry::new(), &Settings::default());

        let response = router
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[test]
    fn openapi_document_lists_health_route() {
        let doc = openapi_document(&ModuleRegistry::new(), &Settings::default());
        assert!(doc.paths.paths.contains_key("/healthz"));
        assert_eq!(doc.info.title, "Books API");
    }
}
