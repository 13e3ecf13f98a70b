//! Peersearch library crate (used by the server and integration tests).
//!
//! Answers "find companies similar to X" queries by combining vector
//! similarity search over precomputed business-concept embeddings with an
//! optional reranking pass, behind a TTL/LRU result cache.
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Document`], [`SearchQuery`], [`SearchResult`] - Search data model
//! - [`SearchOrchestrator`] - The request pipeline
//! - [`SearchCache`], [`CacheConfig`] - TTL + LRU result cache
//!
//! ## Collaborator Ports
//! - [`VectorSearchClient`], [`QdrantSearchClient`] - Similarity search
//! - [`RerankClient`], [`HttpReranker`], [`RerankerConfig`] - Reranking
//! - [`EmbeddingProvider`], [`HashEmbedder`] - Query embeddings
//!
//! ## Observability
//! - [`MetricsRecorder`], [`MetricsSnapshot`] - Process-wide counters and
//!   latency windows
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod metrics;
pub mod rerank;
pub mod search;
pub mod vectordb;

pub use cache::{CacheConfig, SearchCache};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, EmbeddingProvider, HashEmbedder, QUERY_EMBEDDING_DIM};
pub use hashing::{cache_key, hash_to_seed};
pub use metrics::{LatencyStats, MetricsRecorder, MetricsSnapshot, WINDOW_SIZE};
pub use rerank::{HttpReranker, RerankClient, RerankError, RerankerConfig};
#[cfg(any(test, feature = "mock"))]
pub use rerank::{MockRerankClient, ScriptedRerank};
pub use search::{
    Document, SearchError, SearchOrchestrator, SearchPerformance, SearchQuery, SearchResult,
    SearcherConfig,
};
pub use vectordb::{QdrantSearchClient, VectorSearchClient, VectorStoreError};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::{MockVectorSearchClient, cosine_similarity};
