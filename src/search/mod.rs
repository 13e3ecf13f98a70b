//! Search pipeline: query contract, cache-key derivation, orchestration.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod types;


pub use config::SearcherConfig;
pub use error::SearchError;
pub use orchestrator::SearchOrchestrator;
pub use types::{Document, SearchPerformance, SearchQuery, SearchResult};
