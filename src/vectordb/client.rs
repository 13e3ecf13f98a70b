use qdrant_client::Qdrant;
use qdrant_client::qdrant::{Condition, Filter, SearchPointsBuilder};
use std::collections::HashMap;

use crate::search::Document;

use super::error::VectorStoreError;
use super::model::document_from_scored_point;

/// Similarity-search port.
///
/// Implementations return candidates ordered by descending
/// `similarity_score`, each meeting `score_threshold` when one is supplied,
/// and at most `limit` of them. Failures are not recovered here; retry
/// policy, if any, belongs to the backing store.
pub trait VectorSearchClient: Send + Sync {
    /// Searches for the concepts most similar to `embedding`.
    fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
        filters: &HashMap<String, String>,
    ) -> impl std::future::Future<Output = Result<Vec<Document>, VectorStoreError>> + Send;

    /// Readiness probe; not on the request hot path.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), VectorStoreError>> + Send;
}

#[derive(Clone)]
/// Qdrant client over the concept collection.
pub struct QdrantSearchClient {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantSearchClient {
    /// Creates a client for `url` searching `collection`.
    pub async fn new(url: &str, collection: &str) -> Result<Self, VectorStoreError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorStoreError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the configured collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl VectorSearchClient for QdrantSearchClient {
    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Document>, VectorStoreError> {
        let mut search_builder =
            SearchPointsBuilder::new(&self.collection, embedding, limit).with_payload(true);

        if let Some(threshold) = score_threshold {
            search_builder = search_builder.score_threshold(threshold);
        }

        if !filters.is_empty() {
            let conditions: Vec<Condition> = filters
                .iter()
                .map(|(field, value)| Condition::matches(field.as_str(), value.clone()))
                .collect();
            search_builder = search_builder.filter(Filter::must(conditions));
        }

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorStoreError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let documents = search_result
            .result
            .into_iter()
            .filter_map(document_from_scored_point)
            .collect();

        Ok(documents)
    }

    async fn health_check(&self) -> Result<(), VectorStoreError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
