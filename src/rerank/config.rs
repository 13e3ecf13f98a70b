use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone)]
pub struct RerankerConfig {
    /// Base URL of the reranking service (no trailing slash).
    pub base_url: String,

    /// Per-attempt timeout.
    pub timeout: Duration,

    /// Retries after the first attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,
}

impl RerankerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("reranker base_url cannot be empty".to_string());
        }
        if self.timeout.is_zero() {
            return Err("reranker timeout must be positive".to_string());
        }
        Ok(())
    }
}
