//! HTTP gateway (Axum) for the search pipeline.
//!
//! This module is primarily used by the `peersearch` server binary.

pub mod error;
pub mod handler;
pub mod state;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};
pub use handler::{ResultEntry, SearchRequest, SearchResponse, search_handler};
pub use state::HandlerState;

use crate::embedding::EmbeddingProvider;
use crate::rerank::RerankClient;
use crate::vectordb::VectorSearchClient;

pub fn create_router_with_state<V, E, R>(state: HandlerState<V, E, R>) -> Router
where
    V: VectorSearchClient + 'static,
    E: EmbeddingProvider + 'static,
    R: RerankClient + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/search", post(search_handler))
        .route("/performance", get(performance_handler))
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
    pub vector_store: &'static str,
    pub reranker: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

/// Readiness probe: checks the vector store and, when configured, the
/// reranker's `/health`. Kept off the request hot path.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<V, E, R>(State(state): State<HandlerState<V, E, R>>) -> Response
where
    V: VectorSearchClient + 'static,
    E: EmbeddingProvider + 'static,
    R: RerankClient + 'static,
{
    let vector_store_status = match state.orchestrator.vector_store().health_check().await {
        Ok(()) => "ready",
        Err(_) => "error",
    };

    // A reranker outage never blocks readiness: searches degrade to
    // similarity order instead.
    let reranker_status = match state.orchestrator.reranker() {
        None => "disabled",
        Some(reranker) => match reranker.health_check().await {
            Ok(()) => "ready",
            Err(_) => "degraded",
        },
    };

    let is_ready = vector_store_status == "ready";
    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadyResponse {
            status: if is_ready { "ok" } else { "pending" },
            components: ComponentStatus {
                http: "ready",
                vector_store: vector_store_status,
                reranker: reranker_status,
            },
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn performance_handler<V, E, R>(State(state): State<HandlerState<V, E, R>>) -> Response
where
    V: VectorSearchClient + 'static,
    E: EmbeddingProvider + 'static,
    R: RerankClient + 'static,
{
    let snapshot = state.orchestrator.metrics().snapshot();
    (StatusCode::OK, Json(snapshot)).into_response()
}
