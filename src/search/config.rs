use std::time::Duration;

pub const DEFAULT_CANDIDATE_MULTIPLIER: usize = 3;

pub const DEFAULT_CANDIDATE_FLOOR: usize = 50;

#[derive(Debug, Clone)]
pub struct SearcherConfig {
    /// Vector-search candidate limit is `top_k * candidate_multiplier`,
    /// leaving room for reranking to promote lower-similarity candidates.
    pub candidate_multiplier: usize,

    /// Lower bound on the candidate limit regardless of `top_k`.
    pub candidate_floor: usize,

    /// TTL for cached results; `None` uses the cache's default.
    pub result_ttl: Option<Duration>,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        Self {
            candidate_multiplier: DEFAULT_CANDIDATE_MULTIPLIER,
            candidate_floor: DEFAULT_CANDIDATE_FLOOR,
            result_ttl: None,
        }
    }
}

impl SearcherConfig {
    pub fn candidate_multiplier(mut self, multiplier: usize) -> Self {
        assert!(multiplier > 0, "candidate multiplier must be at least 1");
        self.candidate_multiplier = multiplier;
        self
    }

    pub fn candidate_floor(mut self, floor: usize) -> Self {
        self.candidate_floor = floor;
        self
    }

    pub fn result_ttl(mut self, ttl: Duration) -> Self {
        self.result_ttl = Some(ttl);
        self
    }

    /// Candidate limit handed to vector search for a given `top_k`.
    pub fn candidate_limit(&self, top_k: usize) -> u64 {
        top_k
            .saturating_mul(self.candidate_multiplier)
            .max(self.candidate_floor)
            .max(top_k) as u64
    }
}
