//! Query embedding port.
//!
//! The concept embeddings searched against are produced by a separate batch
//! extraction pipeline; at query time this crate only needs one embedding
//! for the query text. [`EmbeddingProvider`] is the seam where a real
//! backend plugs in. [`HashEmbedder`] is the dependency-free fallback used
//! when no backend is configured, mirroring how the rest of the stack runs
//! in stub mode during local development.

pub mod error;

pub use error::EmbeddingError;

use crate::hashing::hash_to_seed;

/// Dimension of query embeddings produced by the default provider.
pub const QUERY_EMBEDDING_DIM: usize = 768;

/// Produces a query embedding for arbitrary text.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text` into a vector of `embedding_dim()` components.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Dimension of the vectors this provider produces.
    fn embedding_dim(&self) -> usize;
}

/// Deterministic pseudo-embedding provider.
///
/// Expands a BLAKE3 seed of the input text into a unit-normalized vector.
/// The output carries no semantic signal; it exists so the pipeline, cache
/// and tests run without an embedding backend. Identical text always embeds
/// to the identical vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self::with_dim(QUERY_EMBEDDING_DIM)
    }

    pub fn with_dim(dim: usize) -> Self {
        assert!(dim > 0, "embedding dimension must be at least 1");
        Self { dim }
    }
}

impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut state = hash_to_seed(text) | 1;
        let mut vector: Vec<f32> = (0..self.dim)
            .map(|_| {
                // xorshift64* over the seed
                state ^= state >> 12;
                state ^= state << 25;
                state ^= state >> 27;
                let mixed = state.wrapping_mul(0x2545F4914F6CDD1D);
                ((mixed >> 40) as f32 / (1 << 24) as f32) * 2.0 - 1.0
            })
            .collect();

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embed_is_deterministic() {
        let embedder = HashEmbedder::with_dim(32);

        let a = embedder.embed("solar inverters").await.unwrap();
        let b = embedder.embed("solar inverters").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    async fn test_different_text_different_embedding() {
        let embedder = HashEmbedder::with_dim(32);

        let a = embedder.embed("solar inverters").await.unwrap();
        let b = embedder.embed("lithium batteries").await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_embedding_is_unit_normalized() {
        let embedder = HashEmbedder::new();

        let v = embedder.embed("300257").await.unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();

        assert!((norm - 1.0).abs() < 1e-4);
    }
}
