use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::search::Document;

use super::client::VectorSearchClient;
use super::error::VectorStoreError;

/// In-memory stand-in for the concept collection.
///
/// Scores stored embeddings with real cosine similarity, honors threshold
/// and filter constraints, counts `search` calls for idempotence
/// assertions, and can be switched into a failing mode to drive the
/// pipeline's error paths.
#[derive(Default)]
pub struct MockVectorSearchClient {
    points: RwLock<Vec<StoredConcept>>,
    search_calls: AtomicUsize,
    failing: AtomicBool,
}

struct StoredConcept {
    document: Document,
    embedding: Vec<f32>,
    attributes: HashMap<String, String>,
}

impl MockVectorSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a concept with its embedding and no filterable attributes.
    pub fn insert(&self, document: Document, embedding: Vec<f32>) {
        self.insert_with_attributes(document, embedding, HashMap::new());
    }

    /// Stores a concept with filterable payload attributes.
    pub fn insert_with_attributes(
        &self,
        document: Document,
        embedding: Vec<f32>,
        attributes: HashMap<String, String>,
    ) {
        self.points
            .write()
            .expect("mock store lock")
            .push(StoredConcept {
                document,
                embedding,
                attributes,
            });
    }

    /// Number of `search` calls made so far.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::Relaxed)
    }

    /// Makes every subsequent `search`/`health_check` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn point_count(&self) -> usize {
        self.points.read().expect("mock store lock").len()
    }
}

impl VectorSearchClient for MockVectorSearchClient {
    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Document>, VectorStoreError> {
        self.search_calls.fetch_add(1, Ordering::Relaxed);

        if self.failing.load(Ordering::Relaxed) {
            return Err(VectorStoreError::Unavailable {
                message: "mock failure injected".to_string(),
            });
        }

        let points = self
            .points
            .read()
            .map_err(|_| VectorStoreError::Unavailable {
                message: "lock poisoned".to_string(),
            })?;

        let mut results: Vec<Document> = points
            .iter()
            .filter(|p| {
                filters
                    .iter()
                    .all(|(k, v)| p.attributes.get(k) == Some(v))
            })
            .map(|p| {
                let mut document = p.document.clone();
                document.similarity_score = cosine_similarity(&embedding, &p.embedding);
                document.rerank_score = None;
                document
            })
            .filter(|d| score_threshold.is_none_or(|t| d.similarity_score >= t))
            .collect();

        results.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(limit as usize);
        Ok(results)
    }

    async fn health_check(&self) -> Result<(), VectorStoreError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(VectorStoreError::Unavailable {
                message: "mock failure injected".to_string(),
            });
        }
        Ok(())
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
