use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::cache::SearchCache;
use crate::embedding::EmbeddingProvider;
use crate::metrics::MetricsRecorder;
use crate::rerank::RerankClient;
use crate::vectordb::VectorSearchClient;

use super::config::SearcherConfig;
use super::error::SearchError;
use super::types::{Document, SearchPerformance, SearchQuery, SearchResult};

/// End-to-end request pipeline: cache lookup, embedding, vector search,
/// optional rerank with similarity-order fallback, final ordering and
/// truncation, cache store.
///
/// Stateless across requests; the cache and metrics recorder are the only
/// shared mutable state. Dropping the returned future (client disconnect)
/// cancels whichever collaborator call is in flight.
pub struct SearchOrchestrator<V, E, R> {
    vector_store: Arc<V>,
    embedder: Arc<E>,
    reranker: Option<Arc<R>>,
    cache: Arc<SearchCache<SearchResult>>,
    metrics: Arc<MetricsRecorder>,
    config: SearcherConfig,
}

impl<V, E, R> SearchOrchestrator<V, E, R>
where
    V: VectorSearchClient,
    E: EmbeddingProvider,
    R: RerankClient,
{
    pub fn new(
        vector_store: Arc<V>,
        embedder: Arc<E>,
        reranker: Option<Arc<R>>,
        cache: Arc<SearchCache<SearchResult>>,
        metrics: Arc<MetricsRecorder>,
        config: SearcherConfig,
    ) -> Self {
        Self {
            vector_store,
            embedder,
            reranker,
            cache,
            metrics,
            config,
        }
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }

    pub fn cache(&self) -> &Arc<SearchCache<SearchResult>> {
        &self.cache
    }

    pub fn vector_store(&self) -> &Arc<V> {
        &self.vector_store
    }

    pub fn reranker(&self) -> Option<&Arc<R>> {
        self.reranker.as_ref()
    }

    /// Runs one query through the pipeline.
    ///
    /// Only validation and vector-store failures surface; rerank failures
    /// fall back to similarity order and cache faults read as misses.
    #[instrument(skip(self, query), fields(target = %query.target_identifier, top_k = query.top_k))]
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let result = self.execute(&query, started).await;
        self.metrics.record_query(started.elapsed(), result.is_ok());
        result
    }

    async fn execute(
        &self,
        query: &SearchQuery,
        started: Instant,
    ) -> Result<SearchResult, SearchError> {
        query.validate()?;

        let key = query.cache_key();
        if let Some(mut cached) = self.cache.get(&key) {
            info!(results = cached.results.len(), "Cache hit");
            cached.cache_hit = true;
            cached.performance.total_time_ms = elapsed_ms(started);
            return Ok(cached);
        }

        debug!("Cache miss, running search pipeline");

        let embedding = self.embedder.embed(query.query_text()).await?;

        let search_started = Instant::now();
        let candidates = self
            .vector_store
            .search(
                embedding,
                self.config.candidate_limit(query.top_k),
                query.similarity_threshold,
                &query.market_filters,
            )
            .await?;
        let search_time_ms = elapsed_ms(search_started);

        debug!(
            candidates = candidates.len(),
            search_time_ms, "Vector search complete"
        );

        let mut rerank_time_ms = None;
        let mut results = match &self.reranker {
            Some(reranker) if !candidates.is_empty() => {
                let rerank_started = Instant::now();
                match reranker
                    .rerank(query.query_text(), candidates.clone(), query.top_k)
                    .await
                {
                    Ok(reranked) => {
                        rerank_time_ms = Some(elapsed_ms(rerank_started));
                        fill_from_candidates(reranked, candidates, query.top_k)
                    }
                    Err(err) => {
                        warn!(
                            error = %err,
                            candidates = candidates.len(),
                            "Rerank failed, falling back to similarity order"
                        );
                        similarity_order(candidates, query.top_k)
                    }
                }
            }
            _ => similarity_order(candidates, query.top_k),
        };

        sort_by_relevance(&mut results);
        results.truncate(query.top_k);

        let result = SearchResult {
            results,
            filters_applied: query.market_filters.clone(),
            performance: SearchPerformance {
                total_time_ms: elapsed_ms(started),
                search_time_ms,
                rerank_time_ms,
            },
            cache_hit: false,
        };

        self.cache.set(&key, result.clone(), self.config.result_ttl);

        Ok(result)
    }
}

impl<V, E, R> std::fmt::Debug for SearchOrchestrator<V, E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("reranker_configured", &self.reranker.is_some())
            .field("config", &self.config)
            .finish()
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

/// Fallback ordering: descending similarity, stable for ties, bounded by
/// `top_k`.
fn similarity_order(mut candidates: Vec<Document>, top_k: usize) -> Vec<Document> {
    candidates.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
    candidates.truncate(top_k);
    candidates
}

/// Tops up a short rerank result with the remaining candidates in their
/// similarity order, keeping the reranked head intact.
fn fill_from_candidates(
    mut reranked: Vec<Document>,
    candidates: Vec<Document>,
    top_k: usize,
) -> Vec<Document> {
    if reranked.len() >= top_k {
        reranked.truncate(top_k);
        return reranked;
    }

    let taken: std::collections::HashSet<String> =
        reranked.iter().map(|d| d.concept_id.clone()).collect();
    for candidate in candidates {
        if reranked.len() == top_k {
            break;
        }
        if !taken.contains(&candidate.concept_id) {
            reranked.push(candidate);
        }
    }
    reranked
}

/// Final ordering contract: descending relevance, stable for ties so the
/// upstream order (similarity or rerank-response) survives.
fn sort_by_relevance(documents: &mut [Document]) {
    documents.sort_by(|a, b| {
        b.relevance_score()
            .partial_cmp(&a.relevance_score())
            .unwrap_or(Ordering::Equal)
    });
}
