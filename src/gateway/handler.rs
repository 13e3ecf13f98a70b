use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

use crate::embedding::EmbeddingProvider;
use crate::rerank::RerankClient;
use crate::search::{Document, SearchPerformance, SearchQuery, SearchResult};
use crate::vectordb::VectorSearchClient;

use super::error::ApiError;
use super::state::HandlerState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query_identifier: String,
    #[serde(default)]
    pub text_to_embed: Option<String>,
    pub top_k: usize,
    #[serde(default)]
    pub similarity_threshold: Option<f32>,
    #[serde(default)]
    pub market_filters: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ResultEntry>,
    pub filters_applied: HashMap<String, String>,
    pub performance: SearchPerformance,
    pub cache_hit: bool,
}

#[derive(Debug, Serialize)]
pub struct ResultEntry {
    pub concept_id: String,
    pub company_code: String,
    pub company_name: String,
    pub concept_name: String,
    pub concept_category: String,
    pub relevance_score: f32,
    pub similarity_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f32>,
    pub importance_score: f32,
}

impl From<Document> for ResultEntry {
    fn from(document: Document) -> Self {
        let relevance_score = document.relevance_score();
        Self {
            concept_id: document.concept_id,
            company_code: document.company_code,
            company_name: document.company_name,
            concept_name: document.concept_name,
            concept_category: document.concept_category,
            relevance_score,
            similarity_score: document.similarity_score,
            rerank_score: document.rerank_score,
            importance_score: document.importance_score,
        }
    }
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            results: result.results.into_iter().map(ResultEntry::from).collect(),
            filters_applied: result.filters_applied,
            performance: result.performance,
            cache_hit: result.cache_hit,
        }
    }
}

#[instrument(skip(state, request), fields(target = %request.query_identifier, top_k = request.top_k))]
pub async fn search_handler<V, E, R>(
    State(state): State<HandlerState<V, E, R>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError>
where
    V: VectorSearchClient + 'static,
    E: EmbeddingProvider + 'static,
    R: RerankClient + 'static,
{
    let mut query = SearchQuery::new(request.query_identifier, request.top_k);
    query.text_to_embed = request.text_to_embed;
    query.similarity_threshold = request.similarity_threshold;
    query.market_filters = request.market_filters;

    let result = state.orchestrator.search(query).await?;
    Ok(Json(SearchResponse::from(result)))
}
