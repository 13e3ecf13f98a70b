//! Pipeline tests running the orchestrator against a real reranking
//! service spawned on an ephemeral port.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, http::StatusCode, routing::post};

use peersearch::cache::{CacheConfig, SearchCache};
use peersearch::embedding::{EmbeddingProvider, HashEmbedder};
use peersearch::metrics::MetricsRecorder;
use peersearch::rerank::{HttpReranker, RerankerConfig};
use peersearch::search::{Document, SearchOrchestrator, SearchQuery, SearcherConfig};
use peersearch::vectordb::MockVectorSearchClient;

type Orchestrator = SearchOrchestrator<MockVectorSearchClient, HashEmbedder, HttpReranker>;

fn concept(i: usize) -> Document {
    Document {
        concept_id: format!("c{i}"),
        company_code: format!("30{i:04}"),
        company_name: format!("Company {i}"),
        concept_name: "solar inverters".to_string(),
        concept_category: "energy".to_string(),
        importance_score: 0.7,
        similarity_score: 0.0,
        rerank_score: None,
    }
}

async fn spawn_reranker(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn orchestrator_with_reranker(
    base_url: &str,
) -> (Orchestrator, Arc<MockVectorSearchClient>, Arc<MetricsRecorder>) {
    let vector = Arc::new(MockVectorSearchClient::new());
    let metrics = Arc::new(MetricsRecorder::new());
    let cache = Arc::new(SearchCache::new(
        CacheConfig::default(),
        Arc::clone(&metrics),
    ));
    let reranker = HttpReranker::new(
        RerankerConfig::new(base_url).with_max_retries(0),
        Arc::clone(&metrics),
    )
    .unwrap();

    let orchestrator = SearchOrchestrator::new(
        Arc::clone(&vector),
        Arc::new(HashEmbedder::with_dim(2)),
        Some(Arc::new(reranker)),
        cache,
        Arc::clone(&metrics),
        SearcherConfig::default(),
    );
    (orchestrator, vector, metrics)
}

async fn seed(vector: &MockVectorSearchClient, query_text: &str, similarities: &[f32]) {
    let q = HashEmbedder::with_dim(2).embed(query_text).await.unwrap();
    let perp = [-q[1], q[0]];

    for (i, &sim) in similarities.iter().enumerate() {
        let ortho = (1.0 - sim * sim).max(0.0).sqrt();
        let embedding = vec![
            sim * q[0] + ortho * perp[0],
            sim * q[1] + ortho * perp[1],
        ];
        vector.insert(concept(i), embedding);
    }
}

#[tokio::test]
async fn test_end_to_end_rerank_over_http() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/rerank",
        post({
            let hits = Arc::clone(&hits);
            move || {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!({
                        "success": true,
                        "data": { "results": [
                            { "original_index": 2, "score": 0.97 },
                            { "original_index": 0, "score": 0.90 },
                        ] }
                    }))
                }
            }
        }),
    );
    let url = spawn_reranker(router).await;
    let (orchestrator, vector, metrics) = orchestrator_with_reranker(&url).await;
    seed(&vector, "solar", &[0.9, 0.8, 0.7]).await;

    let result = orchestrator
        .search(SearchQuery::new("solar", 2))
        .await
        .unwrap();

    assert_eq!(result.results[0].concept_id, "c2");
    assert_eq!(result.results[0].rerank_score, Some(0.97));
    assert_eq!(result.results[1].concept_id, "c0");
    assert!(result.performance.rerank_time_ms.is_some());

    // Identical repeat is served from the cache: no second rerank request.
    let repeat = orchestrator
        .search(SearchQuery::new("solar", 2))
        .await
        .unwrap();
    assert!(repeat.cache_hit);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(vector.search_calls(), 1);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.total_reranks, 1);
    assert_eq!(snapshot.failed_reranks, 0);
    assert_eq!(snapshot.documents_reranked, 3);
}

#[tokio::test]
async fn test_end_to_end_fallback_when_reranker_is_down() {
    let router = Router::new().route(
        "/rerank",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let url = spawn_reranker(router).await;
    let (orchestrator, vector, metrics) = orchestrator_with_reranker(&url).await;
    seed(&vector, "solar", &[0.9, 0.8, 0.7]).await;

    let result = orchestrator
        .search(SearchQuery::new("solar", 2))
        .await
        .unwrap();

    // Caller sees similarity order and no rerank timing, nothing else.
    assert_eq!(result.results[0].concept_id, "c0");
    assert_eq!(result.results[1].concept_id, "c1");
    assert!(result.results.iter().all(|d| d.rerank_score.is_none()));
    assert!(result.performance.rerank_time_ms.is_none());

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.total_queries, 1);
    assert_eq!(snapshot.failed_queries, 0);
    assert_eq!(snapshot.total_reranks, 1);
    assert_eq!(snapshot.failed_reranks, 1);
}

#[tokio::test]
async fn test_fallback_result_is_cached_like_any_other() {
    let router = Router::new().route(
        "/rerank",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let url = spawn_reranker(router).await;
    let (orchestrator, vector, _) = orchestrator_with_reranker(&url).await;
    seed(&vector, "solar", &[0.9, 0.8]).await;

    let first = orchestrator
        .search(SearchQuery::new("solar", 2))
        .await
        .unwrap();
    let second = orchestrator
        .search(SearchQuery::new("solar", 2))
        .await
        .unwrap();

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(vector.search_calls(), 1);
}
