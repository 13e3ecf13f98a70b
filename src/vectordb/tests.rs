use std::collections::HashMap;

use crate::search::Document;

use super::client::VectorSearchClient;
use super::error::VectorStoreError;
use super::mock::{MockVectorSearchClient, cosine_similarity};

fn concept(concept_id: &str, company_code: &str, concept_name: &str) -> Document {
    Document {
        concept_id: concept_id.to_string(),
        company_code: company_code.to_string(),
        company_name: format!("Company {company_code}"),
        concept_name: concept_name.to_string(),
        concept_category: "technology".to_string(),
        importance_score: 0.8,
        similarity_score: 0.0,
        rerank_score: None,
    }
}

/// Axis-aligned embedding: identical axes score 1.0, distinct axes 0.0.
fn axis(dim: usize, index: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[index] = 1.0;
    v
}

#[tokio::test]
async fn test_search_orders_by_descending_similarity() {
    let client = MockVectorSearchClient::new();
    client.insert(concept("c1", "300257", "marine equipment"), vec![1.0, 0.0, 0.0]);
    client.insert(concept("c2", "600519", "baijiu"), vec![0.9, 0.1, 0.0]);
    client.insert(concept("c3", "002594", "electric vehicles"), vec![0.0, 1.0, 0.0]);

    let results = client
        .search(vec![1.0, 0.0, 0.0], 10, None, &HashMap::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].concept_id, "c1");
    assert_eq!(results[1].concept_id, "c2");
    assert_eq!(results[2].concept_id, "c3");
    assert!(results[0].similarity_score >= results[1].similarity_score);
    assert!(results[1].similarity_score >= results[2].similarity_score);
}

#[tokio::test]
async fn test_search_respects_limit() {
    let client = MockVectorSearchClient::new();
    for i in 0..20 {
        client.insert(concept(&format!("c{i}"), "300257", "solar"), axis(32, i));
    }

    let results = client
        .search(axis(32, 0), 5, None, &HashMap::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 5);
}

#[tokio::test]
async fn test_search_applies_similarity_threshold() {
    let client = MockVectorSearchClient::new();
    client.insert(concept("close", "300257", "solar"), vec![1.0, 0.0]);
    client.insert(concept("far", "600519", "baijiu"), vec![0.0, 1.0]);

    let results = client
        .search(vec![1.0, 0.0], 10, Some(0.5), &HashMap::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].concept_id, "close");
    assert!(results[0].similarity_score >= 0.5);
}

#[tokio::test]
async fn test_search_applies_market_filters() {
    let client = MockVectorSearchClient::new();
    client.insert_with_attributes(
        concept("sz", "300257", "solar"),
        vec![1.0, 0.0],
        HashMap::from([("exchange".to_string(), "SZSE".to_string())]),
    );
    client.insert_with_attributes(
        concept("sh", "600519", "solar"),
        vec![1.0, 0.0],
        HashMap::from([("exchange".to_string(), "SSE".to_string())]),
    );

    let filters = HashMap::from([("exchange".to_string(), "SZSE".to_string())]);
    let results = client.search(vec![1.0, 0.0], 10, None, &filters).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].concept_id, "sz");
}

#[tokio::test]
async fn test_search_counts_calls() {
    let client = MockVectorSearchClient::new();

    let _ = client.search(vec![1.0], 10, None, &HashMap::new()).await;
    let _ = client.search(vec![1.0], 10, None, &HashMap::new()).await;

    assert_eq!(client.search_calls(), 2);
}

#[tokio::test]
async fn test_injected_failure() {
    let client = MockVectorSearchClient::new();
    client.set_failing(true);

    let err = client
        .search(vec![1.0], 10, None, &HashMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VectorStoreError::Unavailable { .. }));
    assert!(client.health_check().await.is_err());
}

#[test]
fn test_cosine_similarity_identical_vectors() {
    let v = vec![0.3, 0.5, 0.2];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_orthogonal_vectors() {
    let a = vec![1.0, 0.0];
    let b = vec![0.0, 1.0];
    assert!(cosine_similarity(&a, &b).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_degenerate_inputs() {
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
}
