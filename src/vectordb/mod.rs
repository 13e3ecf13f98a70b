//! Qdrant-backed vector search over the business-concept collection.

pub mod client;
pub mod error;
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::{QdrantSearchClient, VectorSearchClient};
pub use error::VectorStoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorSearchClient, cosine_similarity};
pub use model::document_from_scored_point;

/// Collection searched when none is configured.
pub const DEFAULT_COLLECTION_NAME: &str = "business_concepts";
