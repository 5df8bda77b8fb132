//! Rift-Ripple: a polite player-profile crawler
//!
//! This crate discovers ranked players through the Riot telemetry API, computes
//! per-match performance metrics, and grows its own frontier from the other
//! participants found in each fetched match, respecting rate limits and
//! per-region insertion caps.

pub mod analysis;
pub mod api;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Rift-Ripple operations
#[derive(Debug, Error)]
pub enum RiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Incomplete batch: {validated} of {wanted} matches validated")]
    IncompleteBatch { validated: usize, wanted: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Failures of a single upstream call
///
/// None of these abort the crawl; the unit of work that produced one is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Rate limited on {url} after retry")]
    RateLimited { url: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for Rift-Ripple operations
pub type Result<T> = std::result::Result<T, RiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single upstream calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Re-export commonly used types
pub use analysis::{DiscoveryCandidate, PlayerMatchStats, PlayerSummary};
pub use api::{ApiClient, PlayerIdentity};
pub use config::Config;
pub use crawler::{CapDecision, CrawlReport, Crawler};
