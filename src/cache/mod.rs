//! In-memory search-result cache (TTL + strict LRU).
//!
//! One bounded store maps an opaque string key to a cached value. Entries
//! expire after a per-entry TTL and are evicted least-recently-used first
//! once the store is full. Expired entries are additionally swept lazily,
//! at most once per [`CacheConfig::sweep_interval`], so the sweep cost is
//! independent of traffic volume.
//!
//! The cache is not a source of request failure: every operation is
//! infallible and an anomaly is observed as a miss by the caller.

pub mod config;
mod store;

#[cfg(test)]
mod tests;

pub use config::CacheConfig;
pub use store::SearchCache;
