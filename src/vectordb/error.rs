use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the similarity-search collaborator.
pub enum VectorStoreError {
    /// Could not connect to the vector store endpoint.
    #[error("failed to connect to vector store at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Similarity search failed.
    #[error("failed to search collection '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// The store is reachable but not serving queries.
    #[error("vector store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}
