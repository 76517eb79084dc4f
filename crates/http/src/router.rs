//! Router builder for the Folio HTTP server

use axum::{extract::Request, http::HeaderValue, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use utoipa::openapi::{ComponentsBuilder, InfoBuilder, OpenApi, OpenApiBuilder, ServerBuilder};
use utoipa_swagger_ui::SwaggerUi;
use uuid::{Timestamp, Uuid};

use folio_kernel::{settings::DocsSettings, ModuleRegistry, Settings};

use crate::error::{AppError, ErrorBody};

/// Builder for constructing the main HTTP router.
///
/// Middleware is recorded by the `with_*` methods and applied in `build`,
/// so it wraps every route regardless of call order.
pub struct RouterBuilder {
    router: Router,
    tracing: bool,
    cors: bool,
    request_id: bool,
    timeout: Option<Duration>,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            tracing: false,
            cors: false,
            request_id: false,
            timeout: None,
        }
    }

    /// Merge an already-routed router, e.g. the documented health routes
    pub fn merge(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// Mount a module's router under `prefix`. An empty prefix mounts the
    /// module's paths as they are.
    pub fn mount_module(mut self, prefix: &str, module_router: Router) -> Self {
        self.router = if prefix.is_empty() {
            self.router.merge(module_router)
        } else {
            self.router.nest(prefix, module_router)
        };
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Add request ID middleware (`x-request-id`, set and echoed back)
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Serve the OpenAPI document and a Swagger UI over it
    pub fn with_openapi(mut self, openapi: OpenApi, docs: &DocsSettings) -> Self {
        tracing::debug!(
            paths = openapi.paths.paths.len(),
            ui = %docs.swagger_ui_path,
            "mounting API documentation"
        );

        self.router = self.router.merge(
            SwaggerUi::new(docs.swagger_ui_path.clone()).url(DocsSettings::OPENAPI_PATH, openapi),
        );
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        let mut router = self
            .router
            .fallback(|| async { AppError::not_found("Route not found") });

        if let Some(timeout) = self.timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }

        if self.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }

        if self.request_id {
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble the service OpenAPI document from the base metadata, the
/// server's own routes, and every module's fragment.
pub fn build_openapi(registry: &ModuleRegistry, settings: &Settings, base: OpenApi) -> OpenApi {
    let docs = &settings.docs;
    let prefix = settings.server.api_prefix.as_str();

    let mut openapi = OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(docs.title.clone())
                .version(docs.version.clone())
                .description(Some(docs.description.clone()))
                .build(),
        )
        .servers(Some(vec![ServerBuilder::new()
            .url(settings.server.public_url())
            .build()]))
        .components(Some(
            ComponentsBuilder::new()
                .schema_from::<ErrorBody>()
                .build(),
        ))
        .build();

    openapi.merge(base);

    for module in registry.modules() {
        let Some(fragment) = module.openapi() else {
            continue;
        };

        tracing::debug!(
            module = module.name(),
            paths = fragment.paths.paths.len(),
            "merging module OpenAPI"
        );

        if prefix.is_empty() {
            openapi.merge(fragment);
        } else {
            openapi = openapi.nest(prefix, fragment);
        }
    }

    openapi
}

/// Request ID generator producing time-ordered UUIDs
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
