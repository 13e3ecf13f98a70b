use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::metrics::MetricsRecorder;
use crate::search::Document;

use super::RerankClient;
use super::config::RerankerConfig;
use super::error::RerankError;
use super::wire::{HealthResponse, RerankEntry, RerankRequest, RerankResponse};

/// HTTP client for the reranking service.
///
/// Issues one `POST /rerank` per attempt carrying the full document batch,
/// bounded by the configured per-attempt timeout and retry count. Every
/// attempt, successful or not, is recorded with its latency and document
/// count.
pub struct HttpReranker {
    client: reqwest::Client,
    config: RerankerConfig,
    metrics: Arc<MetricsRecorder>,
}

impl HttpReranker {
    pub fn new(
        config: RerankerConfig,
        metrics: Arc<MetricsRecorder>,
    ) -> Result<Self, RerankError> {
        config
            .validate()
            .map_err(|reason| RerankError::InvalidConfig { reason })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RerankError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            config,
            metrics,
        })
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    fn rerank_url(&self) -> String {
        format!("{}/rerank", self.config.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }

    fn map_transport(&self, err: reqwest::Error) -> RerankError {
        if err.is_timeout() {
            RerankError::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            RerankError::Transport {
                reason: err.to_string(),
            }
        }
    }

    /// One request/response cycle, including contract validation.
    async fn attempt(
        &self,
        request: &RerankRequest,
        document_count: usize,
    ) -> Result<Vec<RerankEntry>, RerankError> {
        let response = self
            .client
            .post(self.rerank_url())
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RerankError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RerankResponse =
            response
                .json()
                .await
                .map_err(|e| RerankError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        if !parsed.success {
            return Err(RerankError::ServiceFailure {
                reason: parsed
                    .error
                    .unwrap_or_else(|| "unspecified failure".to_string()),
            });
        }

        let data = parsed.data.ok_or_else(|| RerankError::ServiceFailure {
            reason: "success envelope without data".to_string(),
        })?;

        validate_entries(&data.results, document_count)?;
        Ok(data.results)
    }
}

impl RerankClient for HttpReranker {
    async fn rerank(
        &self,
        query: &str,
        documents: Vec<Document>,
        top_k: usize,
    ) -> Result<Vec<Document>, RerankError> {
        if documents.is_empty() {
            debug!("No documents to rerank, skipping request");
            return Ok(Vec::new());
        }

        let request = RerankRequest {
            query: query.to_string(),
            documents: documents.iter().map(Document::rerank_text).collect(),
            top_k,
        };

        let attempts = self.config.max_retries + 1;
        let mut last_err = None;

        for attempt in 1..=attempts {
            let start = Instant::now();
            let outcome = self.attempt(&request, documents.len()).await;
            self.metrics
                .record_rerank(start.elapsed(), documents.len(), outcome.is_ok());

            match outcome {
                Ok(entries) => {
                    debug!(
                        documents = documents.len(),
                        returned = entries.len(),
                        attempt,
                        "Rerank succeeded"
                    );
                    return Ok(apply_entries(&documents, entries, top_k));
                }
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        documents = documents.len(),
                        error = %err,
                        "Rerank attempt failed"
                    );
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.expect("at least one attempt was made"))
    }

    async fn health_check(&self) -> Result<(), RerankError> {
        let response = self
            .client
            .get(self.health_url())
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RerankError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let health: HealthResponse =
            response
                .json()
                .await
                .map_err(|e| RerankError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        if health.is_healthy() {
            Ok(())
        } else {
            Err(RerankError::ServiceFailure {
                reason: format!("reranker status: {}", health.status),
            })
        }
    }
}

/// Checks the `original_index` contract: unique values, all within the
/// request's document sequence.
fn validate_entries(entries: &[RerankEntry], document_count: usize) -> Result<(), RerankError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.original_index >= document_count {
            return Err(RerankError::InvalidResponse {
                reason: format!(
                    "original_index {} out of range for {} documents",
                    entry.original_index, document_count
                ),
            });
        }
        if !seen.insert(entry.original_index) {
            return Err(RerankError::InvalidResponse {
                reason: format!("duplicate original_index {}", entry.original_index),
            });
        }
    }
    Ok(())
}

/// Maps scored positions back onto the input documents, preserving the
/// response's order and bounding the result to `top_k`.
fn apply_entries(
    documents: &[Document],
    entries: Vec<RerankEntry>,
    top_k: usize,
) -> Vec<Document> {
    let mut reranked: Vec<Document> = entries
        .into_iter()
        .map(|entry| {
            let mut document = documents[entry.original_index].clone();
            document.rerank_score = Some(entry.score);
            document
        })
        .collect();
    reranked.truncate(top_k);
    reranked
}
