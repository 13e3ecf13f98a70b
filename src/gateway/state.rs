use std::sync::Arc;

use crate::embedding::EmbeddingProvider;
use crate::rerank::RerankClient;
use crate::search::SearchOrchestrator;
use crate::vectordb::VectorSearchClient;

/// Shared per-request handler state.
pub struct HandlerState<V, E, R> {
    pub orchestrator: Arc<SearchOrchestrator<V, E, R>>,
}

impl<V, E, R> HandlerState<V, E, R>
where
    V: VectorSearchClient,
    E: EmbeddingProvider,
    R: RerankClient,
{
    pub fn new(orchestrator: Arc<SearchOrchestrator<V, E, R>>) -> Self {
        Self { orchestrator }
    }
}

impl<V, E, R> Clone for HandlerState<V, E, R> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}
