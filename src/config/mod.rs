//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `PEERSEARCH_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::rerank::RerankerConfig;
use crate::search::SearcherConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `PEERSEARCH_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Concept collection searched for candidates.
    pub collection: String,

    /// Reranking service base URL. Unset means searches skip reranking.
    pub reranker_url: Option<String>,

    /// Per-attempt reranker timeout in seconds. Default: `5`.
    pub reranker_timeout_secs: u64,

    /// Reranker retries after the first attempt. Default: `2`.
    pub reranker_max_retries: u32,

    /// Max entries in the result cache. Default: `10_000`.
    pub cache_max_entries: usize,

    /// Result cache TTL in seconds. Default: `3600`.
    pub cache_ttl_secs: u64,

    /// Minimum spacing between expired-entry sweeps. Default: `60`.
    pub cache_sweep_interval_secs: u64,

    /// Vector-search candidate multiplier over `top_k`. Default: `3`.
    pub candidate_multiplier: usize,
}

/// Default Qdrant URL used when `PEERSEARCH_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: crate::vectordb::DEFAULT_COLLECTION_NAME.to_string(),
            reranker_url: None,
            reranker_timeout_secs: 5,
            reranker_max_retries: 2,
            cache_max_entries: 10_000,
            cache_ttl_secs: 3_600,
            cache_sweep_interval_secs: 60,
            candidate_multiplier: 3,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "PEERSEARCH_PORT";
    const ENV_BIND_ADDR: &'static str = "PEERSEARCH_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "PEERSEARCH_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "PEERSEARCH_COLLECTION";
    const ENV_RERANKER_URL: &'static str = "PEERSEARCH_RERANKER_URL";
    const ENV_RERANKER_TIMEOUT: &'static str = "PEERSEARCH_RERANKER_TIMEOUT_SECS";
    const ENV_RERANKER_RETRIES: &'static str = "PEERSEARCH_RERANKER_MAX_RETRIES";
    const ENV_CACHE_MAX_ENTRIES: &'static str = "PEERSEARCH_CACHE_MAX_ENTRIES";
    const ENV_CACHE_TTL: &'static str = "PEERSEARCH_CACHE_TTL_SECS";
    const ENV_CACHE_SWEEP_INTERVAL: &'static str = "PEERSEARCH_CACHE_SWEEP_INTERVAL_SECS";
    const ENV_CANDIDATE_MULTIPLIER: &'static str = "PEERSEARCH_CANDIDATE_MULTIPLIER";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let reranker_url = Self::parse_optional_string_from_env(Self::ENV_RERANKER_URL);
        let reranker_timeout_secs =
            Self::parse_u64_from_env(Self::ENV_RERANKER_TIMEOUT, defaults.reranker_timeout_secs);
        let reranker_max_retries = Self::parse_u64_from_env(
            Self::ENV_RERANKER_RETRIES,
            defaults.reranker_max_retries as u64,
        ) as u32;
        let cache_max_entries = Self::parse_u64_from_env(
            Self::ENV_CACHE_MAX_ENTRIES,
            defaults.cache_max_entries as u64,
        ) as usize;
        let cache_ttl_secs =
            Self::parse_u64_from_env(Self::ENV_CACHE_TTL, defaults.cache_ttl_secs);
        let cache_sweep_interval_secs = Self::parse_u64_from_env(
            Self::ENV_CACHE_SWEEP_INTERVAL,
            defaults.cache_sweep_interval_secs,
        );
        let candidate_multiplier = Self::parse_u64_from_env(
            Self::ENV_CANDIDATE_MULTIPLIER,
            defaults.candidate_multiplier as u64,
        ) as usize;

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            collection,
            reranker_url,
            reranker_timeout_secs,
            reranker_max_retries,
            cache_max_entries,
            cache_ttl_secs,
            cache_sweep_interval_secs,
            candidate_multiplier,
        })
    }

    /// Validates value ranges (does not probe any endpoint).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "qdrant_url",
                value: self.qdrant_url.clone(),
            });
        }

        if self.collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "collection",
                value: self.collection.clone(),
            });
        }

        if let Some(ref url) = self.reranker_url
            && url.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                name: "reranker_url",
                value: url.clone(),
            });
        }

        if self.cache_max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                name: "cache_max_entries",
                value: "0".to_string(),
            });
        }

        if self.candidate_multiplier == 0 {
            return Err(ConfigError::InvalidValue {
                name: "candidate_multiplier",
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .max_entries(self.cache_max_entries)
            .default_ttl(Duration::from_secs(self.cache_ttl_secs))
            .sweep_interval(Duration::from_secs(self.cache_sweep_interval_secs))
    }

    /// Reranker settings, or `None` when no reranker is configured.
    pub fn reranker_config(&self) -> Option<RerankerConfig> {
        self.reranker_url.as_ref().map(|url| {
            RerankerConfig::new(url.clone())
                .with_timeout(Duration::from_secs(self.reranker_timeout_secs))
                .with_max_retries(self.reranker_max_retries)
        })
    }

    /// Orchestrator settings derived from this configuration.
    pub fn searcher_config(&self) -> SearcherConfig {
        SearcherConfig::default().candidate_multiplier(self.candidate_multiplier)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
