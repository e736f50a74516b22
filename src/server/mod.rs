//! HTTP surface: router assembly and the serve loop.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/convert-to-jpg/` | image → JPEG |
//! | POST | `/convert-to-png/` | image → PNG |
//! | POST | `/convert-to-pdf/` | `.docx` → PDF |
//! | POST | `/convert-to-docx/` | Markdown → `.docx` |
//! | POST | `/convert-to-csv/` | spreadsheet → CSV |
//! | POST | `/convert-to-xls/` | CSV → `.xlsx` |
//! | GET | `/healthz` | liveness probe |
//! | GET | `/static/*` | files from the configured static directory |
//!
//! Every conversion route takes `multipart/form-data` with the upload in
//! the `file` field.

pub mod error_response;
pub mod handler;

use crate::config::{ErrorStatusPolicy, ServerConfig};
use crate::error::ServerError;
use crate::registry::TransformRegistry;
use crate::routes::RouteTable;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Read-only state shared by all handlers.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub registry: Arc<TransformRegistry>,
    pub routes: RouteTable,
    pub error_status: ErrorStatusPolicy,
}

impl ServerState {
    /// Pair a registry with a route table, failing if any route points at
    /// a conversion the registry cannot serve.
    pub fn new(
        registry: TransformRegistry,
        routes: RouteTable,
        error_status: ErrorStatusPolicy,
    ) -> Result<Self, ServerError> {
        registry.validate_routes(&routes)?;
        Ok(Self {
            registry: Arc::new(registry),
            routes,
            error_status,
        })
    }

    pub fn builtin(error_status: ErrorStatusPolicy) -> Result<Self, ServerError> {
        Self::new(TransformRegistry::builtin(), RouteTable::builtin(), error_status)
    }
}

/// Build the full router for the built-in routes and transforms.
pub fn app(config: &ServerConfig) -> Result<Router, ServerError> {
    let state = ServerState::builtin(config.error_status)?;
    Ok(build_router(config, state))
}

/// Mount every route of `state.routes` plus health, static files, CORS,
/// tracing and the JSON 404 fallback.
pub fn build_router(config: &ServerConfig, state: ServerState) -> Router {
    let mut router = Router::new();
    for route in state.routes.iter() {
        router = router.route(
            route.path,
            post(
                move |State(state): State<ServerState>,
                      multipart: Result<Multipart, MultipartRejection>| {
                    handler::convert_upload(state, route, multipart)
                },
            ),
        );
    }
    router = router.route("/healthz", get(health_check));

    if let Some(dir) = &config.static_dir {
        if dir.is_dir() {
            router = router.nest_service("/static", ServeDir::new(dir));
        } else {
            warn!(
                "Static directory '{}' does not exist; /static is not mounted",
                dir.display()
            );
        }
    }

    let body_limit = match config.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    router
        .fallback(not_found)
        .with_state(state)
        .layer(body_limit)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Credentialed CORS for the configured origins. Credentials rule out `*`,
/// so methods and headers are mirrored from the preflight instead.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.origin_header_values()))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> Response {
    error_response::error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Bind, serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let router = app(&config)?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    let local = listener.local_addr().map_err(ServerError::Serve)?;
    info!(
        "Listening on http://{} (origins: {:?}, error status: {:?})",
        local, config.allowed_origins, config.error_status
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
