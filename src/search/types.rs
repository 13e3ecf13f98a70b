use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::hashing::cache_key;

use super::error::SearchError;

/// One candidate search result: a business concept attached to a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque unique id of the concept record.
    pub concept_id: String,
    pub company_code: String,
    pub company_name: String,
    pub concept_name: String,
    pub concept_category: String,

    /// Static relevance of the concept to its company, in `[0, 1]`.
    pub importance_score: f32,

    /// Cosine similarity between the query embedding and the concept
    /// embedding, in `[-1, 1]`. Set by vector search.
    pub similarity_score: f32,

    /// Set only when reranking succeeded for this document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f32>,
}

impl Document {
    /// Final score used for ordering: the rerank score when present,
    /// otherwise the similarity score.
    #[inline]
    pub fn relevance_score(&self) -> f32 {
        self.rerank_score.unwrap_or(self.similarity_score)
    }

    /// Text surface handed to the reranker. Matches the concept fields the
    /// embeddings were computed from.
    pub fn rerank_text(&self) -> String {
        format!(
            "{} {} {}",
            self.company_name, self.concept_name, self.concept_category
        )
    }
}

/// Input contract for one similarity query.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Company code or free text naming the target.
    pub target_identifier: String,

    /// Optional override text used to build the query embedding.
    pub text_to_embed: Option<String>,

    /// Upper bound on the number of returned documents.
    pub top_k: usize,

    /// Optional lower bound on `similarity_score` for candidates.
    pub similarity_threshold: Option<f32>,

    /// Opaque constraints passed through to vector search.
    pub market_filters: HashMap<String, String>,
}

impl SearchQuery {
    pub fn new(target_identifier: impl Into<String>, top_k: usize) -> Self {
        Self {
            target_identifier: target_identifier.into(),
            text_to_embed: None,
            top_k,
            similarity_threshold: None,
            market_filters: HashMap::new(),
        }
    }

    pub fn with_text_to_embed(mut self, text: impl Into<String>) -> Self {
        self.text_to_embed = Some(text.into());
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn with_market_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.market_filters.insert(key.into(), value.into());
        self
    }

    /// The text the query embedding is built from: the explicit override
    /// when present, else the target identifier itself.
    pub fn query_text(&self) -> &str {
        self.text_to_embed
            .as_deref()
            .unwrap_or(&self.target_identifier)
    }

    /// Rejects malformed queries before any collaborator is called.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.target_identifier.trim().is_empty() {
            return Err(SearchError::Validation {
                reason: "target_identifier cannot be empty".to_string(),
            });
        }
        if self.top_k == 0 {
            return Err(SearchError::Validation {
                reason: "top_k must be positive".to_string(),
            });
        }
        if let Some(threshold) = self.similarity_threshold
            && !(-1.0..=1.0).contains(&threshold)
        {
            return Err(SearchError::Validation {
                reason: format!("similarity_threshold must be within [-1, 1], got {threshold}"),
            });
        }
        Ok(())
    }

    /// Deterministic cache key for this query.
    ///
    /// Optional parameters contribute name/value pairs that are sorted by
    /// name inside [`crate::hashing::cache_key`], so supply order never
    /// changes the key.
    /// Market-filter names carry a `filter.` prefix to keep them disjoint
    /// from the built-in parameter names.
    pub fn cache_key(&self) -> String {
        let mut params: Vec<(String, String)> =
            vec![("top_k".to_string(), self.top_k.to_string())];
        if let Some(ref text) = self.text_to_embed {
            params.push(("text_to_embed".to_string(), text.clone()));
        }
        if let Some(threshold) = self.similarity_threshold {
            params.push(("similarity_threshold".to_string(), threshold.to_string()));
        }
        for (name, value) in &self.market_filters {
            params.push((format!("filter.{name}"), value.clone()));
        }

        cache_key("similar_companies", &self.target_identifier, &params)
    }
}

/// Timing block reported with every search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPerformance {
    pub total_time_ms: f64,
    pub search_time_ms: f64,
    /// Absent when reranking was skipped or fell back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_time_ms: Option<f64>,
}

/// Ordered, size-bounded output of the search pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// At most `top_k` documents, sorted descending by relevance score.
    pub results: Vec<Document>,
    pub filters_applied: HashMap<String, String>,
    pub performance: SearchPerformance,
    /// Whether this response was served from the result cache.
    pub cache_hit: bool,
}
