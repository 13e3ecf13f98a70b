//! Reranker adapter.
//!
//! Wraps the external reranking service's HTTP contract with retry and
//! timeout policy and translates results back onto the input documents.
//! A rerank failure is never fatal to a search request: the orchestrator
//! falls back to similarity order when this adapter errors.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod wire;


pub use config::RerankerConfig;
pub use error::RerankError;
pub use http::HttpReranker;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockRerankClient, ScriptedRerank};
pub use wire::{RerankEntry, RerankRequest, RerankResponse};

use crate::search::Document;

/// Reranking port.
///
/// Given a query and an ordered document batch, returns a reordering with
/// per-document `rerank_score`s, truncated to `top_k`. An empty input batch
/// returns an empty result without any network call. Implementations must
/// fail within a bounded time (per-attempt timeout x bounded retries) and
/// must never fabricate an ordering on failure.
pub trait RerankClient: Send + Sync {
    /// Reranks `documents` against `query`.
    fn rerank(
        &self,
        query: &str,
        documents: Vec<Document>,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, RerankError>> + Send;

    /// Readiness probe against the service's `/health` endpoint; not on the
    /// request hot path.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), RerankError>> + Send;
}
