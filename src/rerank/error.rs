use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the reranker adapter.
///
/// All of these are recovered by the orchestrator's similarity-order
/// fallback; none reach the caller.
pub enum RerankError {
    /// Invalid adapter configuration.
    #[error("invalid reranker configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },

    /// Transport-level failure (connect, DNS, body read).
    #[error("rerank request failed: {reason}")]
    Transport {
        /// Error message.
        reason: String,
    },

    /// One attempt exceeded the per-attempt timeout.
    #[error("rerank request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured per-attempt timeout in milliseconds.
        timeout_ms: u64,
    },

    /// Non-success HTTP status from the service.
    #[error("reranker returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The service answered 2xx but reported failure in the envelope.
    #[error("reranker reported failure: {reason}")]
    ServiceFailure {
        /// Error message.
        reason: String,
    },

    /// The response violates the rerank contract (duplicate or
    /// out-of-range `original_index`, unparseable body).
    #[error("invalid rerank response: {reason}")]
    InvalidResponse {
        /// What was violated.
        reason: String,
    },
}
