//! Crawler module for breadth-first player discovery
//!
//! This module contains the core crawling logic, including:
//! - The frontier queue with dedup and region caps
//! - The operator decision at cap exhaustion
//! - Overall crawl coordination

mod coordinator;
mod decision;
mod frontier;

pub use coordinator::{CrawlReport, Crawler, StepOutcome, StopReason};
pub use decision::{
    decider_for, format_counts, CapDecider, CapDecision, FixedDecision, PromptDecider,
};
pub use frontier::Frontier;

use crate::api::ApiClient;
use crate::config::Config;
use crate::storage::open_storage;
use crate::Result;
use std::path::Path;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the storage database
/// 2. Build the rate-limited API client
/// 3. Resolve and enqueue the seed players
/// 4. Crawl until a stop condition holds
///
/// # Example
///
/// ```no_run
/// use rift_ripple::config::{load_config_with_hash, resolve_api_key};
/// use rift_ripple::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let api_key = resolve_api_key(&config.api)?;
/// let report = run_crawl(&config, api_key, &hash).await?;
/// println!("Inserted {} players", report.inserted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, api_key: String, config_hash: &str) -> Result<CrawlReport> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let client = ApiClient::new(&config.api, api_key)?;

    let mut crawler = Crawler::new(config, client, storage)?.with_config_hash(config_hash);
    if crawler.seed(&config.seeds).await == 0 {
        tracing::warn!("No seed players could be resolved");
    }

    crawler.run().await
}
