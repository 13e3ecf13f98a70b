use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorStoreError;

#[derive(Debug, Error)]
/// Errors surfaced by the search pipeline.
///
/// Reranker and cache faults never appear here: reranker failures are
/// absorbed by the similarity-order fallback, and the cache is infallible
/// by construction.
pub enum SearchError {
    /// Malformed query, rejected before any collaborator call.
    #[error("invalid query: {reason}")]
    Validation {
        /// What was wrong with the query.
        reason: String,
    },

    /// The similarity-search collaborator failed or timed out.
    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),

    /// The query embedding could not be produced.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
