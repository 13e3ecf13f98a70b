use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by embedding providers.
pub enum EmbeddingError {
    /// The embedding backend could not be reached or failed.
    #[error("embedding backend unavailable: {reason}")]
    BackendUnavailable {
        /// Error message.
        reason: String,
    },

    /// Input text the provider cannot embed.
    #[error("cannot embed input: {reason}")]
    InvalidInput {
        /// Error message.
        reason: String,
    },
}
