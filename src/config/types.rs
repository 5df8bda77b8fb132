use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Rift-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "seed")]
    pub seeds: Vec<SeedEntry>,
}

/// Upstream API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL used for account resolution
    #[serde(rename = "account-base")]
    pub account_base: String,

    /// Regional routing bases, searched in order for match history
    #[serde(rename = "regional-bases")]
    pub regional_bases: Vec<String>,

    /// Requests allowed per rate window
    #[serde(rename = "requests-per-window", default = "default_requests_per_window")]
    pub requests_per_window: u32,

    /// Length of the rate window (seconds)
    #[serde(rename = "window-seconds", default = "default_window_seconds")]
    pub window_seconds: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Backoff used when a 429 carries no usable Retry-After (seconds)
    #[serde(rename = "default-retry-after-secs", default = "default_retry_after")]
    pub default_retry_after_secs: u64,
}

impl ApiConfig {
    /// Minimum spacing between two consecutive request attempts
    pub fn min_spacing(&self) -> Duration {
        Duration::from_secs_f64(self.window_seconds as f64 / self.requests_per_window as f64)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Exact number of validated matches required per player
    #[serde(rename = "matches-per-player", default = "default_matches_per_player")]
    pub matches_per_player: usize,

    /// Stop once this many players have been inserted
    #[serde(rename = "target-inserted-players")]
    pub target_inserted_players: u64,

    /// Hard ceiling on players handed to the aggregator
    #[serde(rename = "max-processed-players")]
    pub max_processed_players: u64,

    /// Maximum inserted players per region before an operator decision
    #[serde(rename = "region-cap")]
    pub region_cap: u32,

    /// What to do once every known region is at cap
    #[serde(rename = "on-cap-exhausted", default)]
    pub on_cap_exhausted: CapPolicy,
}

/// Policy applied when every known region has reached its cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapPolicy {
    /// Ask on the terminal
    #[default]
    Prompt,
    /// Reset the counters and keep going
    Continue,
    /// End the run
    Stop,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown leaderboard file
    #[serde(rename = "leaderboard-path")]
    pub leaderboard_path: String,
}

/// A seed player given by display name and tag
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub name: String,
    pub tag: String,
}

fn default_api_key_env() -> String {
    "RIOT_API_KEY".to_string()
}

fn default_requests_per_window() -> u32 {
    190
}

fn default_window_seconds() -> u64 {
    120
}

fn default_request_timeout() -> u64 {
    10
}

fn default_retry_after() -> u64 {
    5
}

fn default_matches_per_player() -> usize {
    5
}
