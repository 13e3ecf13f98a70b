use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::search::Document;

use super::RerankClient;
use super::error::RerankError;

/// One scripted outcome for a [`MockRerankClient`] call.
#[derive(Debug, Clone)]
pub enum ScriptedRerank {
    /// Answer with `(original_index, score)` pairs, mapped onto the input
    /// documents exactly like the HTTP adapter would.
    Respond(Vec<(usize, f32)>),
    /// Fail the call.
    Fail,
}

/// Scriptable stand-in for the reranking service.
///
/// Calls consume scripted outcomes in order; once the script is exhausted
/// (or when none was given) the mock echoes the input order back with
/// `rerank_score = similarity_score`, truncated to `top_k`.
#[derive(Default)]
pub struct MockRerankClient {
    script: Mutex<VecDeque<ScriptedRerank>>,
    calls: AtomicUsize,
}

impl MockRerankClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(outcomes: impl IntoIterator<Item = ScriptedRerank>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock whose every call fails.
    pub fn failing() -> Self {
        // A long script of failures; practically inexhaustible in tests.
        Self::with_script(std::iter::repeat_n(ScriptedRerank::Fail, 1024))
    }

    /// Number of `rerank` calls that reached the mock (the empty-input
    /// short-circuit does not count, matching the no-network contract).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RerankClient for MockRerankClient {
    async fn rerank(
        &self,
        _query: &str,
        documents: Vec<Document>,
        top_k: usize,
    ) -> Result<Vec<Document>, RerankError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        self.calls.fetch_add(1, Ordering::Relaxed);

        let outcome = self.script.lock().pop_front();
        match outcome {
            Some(ScriptedRerank::Fail) => Err(RerankError::ServiceFailure {
                reason: "scripted failure".to_string(),
            }),
            Some(ScriptedRerank::Respond(pairs)) => {
                let mut reranked: Vec<Document> = pairs
                    .into_iter()
                    .map(|(original_index, score)| {
                        let mut document = documents[original_index].clone();
                        document.rerank_score = Some(score);
                        document
                    })
                    .collect();
                reranked.truncate(top_k);
                Ok(reranked)
            }
            None => {
                let mut echoed: Vec<Document> = documents
                    .into_iter()
                    .map(|mut document| {
                        document.rerank_score = Some(document.similarity_score);
                        document
                    })
                    .collect();
                echoed.truncate(top_k);
                Ok(echoed)
            }
        }
    }

    async fn health_check(&self) -> Result<(), RerankError> {
        Ok(())
    }
}
