//! HTTP gateway (Axum) over the query pipeline.
//!
//! This module is primarily used by the `sqlgen` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{QueryRequest, QueryResponse, query_handler};
pub use state::HandlerState;

use crate::generation::CompletionBackend;
use crate::kvstore::KeyValueStore;
use crate::schema::Dialect;
use crate::vectordb::VectorStore;

/// Response header carrying `cache` or `generated` on answers, and the readiness status
/// on health endpoints.
pub const SQLGEN_SOURCE_HEADER: &str = "x-sqlgen-source";
pub const SQLGEN_STATUS_HEADER: &str = "x-sqlgen-status";
/// Attached to every answer.
pub const SQLGEN_WARNING_HEADER: &str = "x-sqlgen-warning";
pub const INACCURATE_OUTPUT_WARNING: &str =
    "Generated queries may be inaccurate. Review before running them.";

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_PENDING: &str = "pending";

pub fn create_router_with_state<K, V, C>(state: HandlerState<K, V, C>) -> Router
where
    K: KeyValueStore + 'static,
    V: VectorStore + 'static,
    C: CompletionBackend + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<K, V, C>))
        .route("/v1/query", post(query_handler::<K, V, C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub kvstore: &'static str,
    pub vectordb: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(SQLGEN_STATUS_HEADER, HeaderValue::from_static(STATUS_HEALTHY));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<K, V, C>(State(state): State<HandlerState<K, V, C>>) -> Response
where
    K: KeyValueStore + 'static,
    V: VectorStore + 'static,
    C: CompletionBackend + 'static,
{
    let registry = state.pipeline.registry();

    let mut kv_ready = true;
    let mut vectors_ready = true;
    for dialect in Dialect::ALL {
        let resources = registry.dialect(dialect);
        kv_ready &= resources.exact.is_ready().await;
        vectors_ready &= resources.semantic.is_ready().await;
    }

    let status_of = |ready: bool| if ready { STATUS_READY } else { STATUS_PENDING };
    let is_stub = registry.dialect(Dialect::PostgreSql).semantic.is_embedder_stub();

    let components = ComponentStatus {
        http: STATUS_READY,
        kvstore: status_of(kv_ready),
        vectordb: status_of(vectors_ready),
        embedder_mode: if is_stub { "stub" } else { "http" },
    };

    let is_ready = kv_ready && vectors_ready;
    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { STATUS_PENDING };

    let mut headers = HeaderMap::new();
    headers.insert(SQLGEN_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
