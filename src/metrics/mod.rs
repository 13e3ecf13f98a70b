//! Process-wide query metrics.
//!
//! Counters are updated independently per event with atomic increments;
//! the two latency windows sit behind their own short-lived locks. A
//! [`MetricsRecorder::snapshot`] read does not mutate state and tolerates
//! skew across fields that were updated while it ran.


use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Number of samples retained per latency window for percentile computation.
pub const WINDOW_SIZE: usize = 1000;

/// Shared counters and bounded latency windows for the search pipeline.
pub struct MetricsRecorder {
    started_at: Instant,
    total_queries: AtomicU64,
    failed_queries: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    total_reranks: AtomicU64,
    failed_reranks: AtomicU64,
    documents_reranked: AtomicU64,
    query_latencies_ms: Mutex<VecDeque<f64>>,
    rerank_latencies_ms: Mutex<VecDeque<f64>>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_queries: AtomicU64::new(0),
            failed_queries: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            total_reranks: AtomicU64::new(0),
            failed_reranks: AtomicU64::new(0),
            documents_reranked: AtomicU64::new(0),
            query_latencies_ms: Mutex::new(VecDeque::with_capacity(WINDOW_SIZE)),
            rerank_latencies_ms: Mutex::new(VecDeque::with_capacity(WINDOW_SIZE)),
        }
    }

    /// Records one completed query (successful or not) with its wall-clock
    /// latency.
    pub fn record_query(&self, latency: Duration, success: bool) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failed_queries.fetch_add(1, Ordering::Relaxed);
        }
        push_sample(&self.query_latencies_ms, latency);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one rerank attempt with its latency and document count.
    pub fn record_rerank(&self, latency: Duration, documents: usize, success: bool) {
        self.total_reranks.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.failed_reranks.fetch_add(1, Ordering::Relaxed);
        }
        self.documents_reranked
            .fetch_add(documents as u64, Ordering::Relaxed);
        push_sample(&self.rerank_latencies_ms, latency);
    }

    /// Returns all derived figures without mutating state.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_queries = self.total_queries.load(Ordering::Relaxed);
        let failed_queries = self.failed_queries.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);

        let success_rate = if total_queries > 0 {
            (total_queries - failed_queries.min(total_queries)) as f64 / total_queries as f64
        } else {
            0.0
        };
        let lookups = cache_hits + cache_misses;
        let cache_hit_rate = if lookups > 0 {
            cache_hits as f64 / lookups as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            timestamp: Utc::now(),
            uptime_seconds: self.started_at.elapsed().as_secs_f64(),
            total_queries,
            failed_queries,
            success_rate,
            cache_hits,
            cache_misses,
            cache_hit_rate,
            query_latency: latency_stats(&self.query_latencies_ms.lock()),
            total_reranks: self.total_reranks.load(Ordering::Relaxed),
            failed_reranks: self.failed_reranks.load(Ordering::Relaxed),
            documents_reranked: self.documents_reranked.load(Ordering::Relaxed),
            rerank_latency: latency_stats(&self.rerank_latencies_ms.lock()),
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field(
                "total_queries",
                &self.total_queries.load(Ordering::Relaxed),
            )
            .field("cache_hits", &self.cache_hits.load(Ordering::Relaxed))
            .finish()
    }
}

/// Aggregates over one bounded latency window.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyStats {
    pub average_ms: f64,
    pub p95_ms: f64,
    pub samples: usize,
}

/// Point-in-time view of all recorded figures.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub success_rate: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub query_latency: LatencyStats,
    pub total_reranks: u64,
    pub failed_reranks: u64,
    pub documents_reranked: u64,
    pub rerank_latency: LatencyStats,
}

fn push_sample(window: &Mutex<VecDeque<f64>>, latency: Duration) {
    let mut window = window.lock();
    if window.len() == WINDOW_SIZE {
        window.pop_front();
    }
    window.push_back(latency.as_secs_f64() * 1000.0);
}

fn latency_stats(window: &VecDeque<f64>) -> LatencyStats {
    if window.is_empty() {
        return LatencyStats {
            average_ms: 0.0,
            p95_ms: 0.0,
            samples: 0,
        };
    }

    let mut sorted: Vec<f64> = window.iter().copied().collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let average_ms = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let rank = ((sorted.len() as f64) * 0.95).ceil() as usize;
    let p95_ms = sorted[rank.clamp(1, sorted.len()) - 1];

    LatencyStats {
        average_ms,
        p95_ms,
        samples: sorted.len(),
    }
}
