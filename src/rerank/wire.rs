//! Wire types for the reranking service's HTTP contract.
//!
//! `POST /rerank` takes the query, one rendered string per document
//! (positionally indexed), and `top_k`; the response refers back into the
//! request's document sequence by `original_index`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankRequest {
    pub query: String,
    pub documents: Vec<String>,
    pub top_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RerankData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankData {
    pub results: Vec<RerankEntry>,
}

/// One scored position in the response, referring back into the request's
/// document sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RerankEntry {
    pub original_index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
