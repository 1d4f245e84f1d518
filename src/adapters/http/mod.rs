//! HTTP adapters - REST API implementations.
//!
//! Each area has its own router; [`api_router`] nests them under `/v1`
//! and applies tracing, CORS and the request timeout.

pub mod chat;
pub mod cluster;
pub mod documents;
pub mod error;

pub use chat::{chat_routes, ChatHandlers};
pub use cluster::{cluster_routes, ClusterHandlers};
pub use documents::{document_routes, DocumentHandlers};
pub use error::{ApiError, ErrorResponse};

use std::time::Duration;

use axum::{http::HeaderValue, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// Allowed origins; empty allows any
    pub cors_origins: Vec<String>,
}

/// Builds the complete application router.
pub fn api_router(
    chat: ChatHandlers,
    cluster: ClusterHandlers,
    documents: DocumentHandlers,
    settings: &HttpSettings,
) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/v1/chat", chat_routes(chat))
        .nest("/v1/k8s", cluster_routes(cluster))
        .nest("/v1/docs", document_routes(documents))
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if parsed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// GET /
async fn root() -> Json<Value> {
    Json(json!({
        "name": "SRE Assistant",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
