//! Output module for reports on stored crawl results
//!
//! This module handles:
//! - Recording and printing crawl statistics
//! - Exporting a markdown leaderboard of player summaries

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_leaderboard, generate_markdown_leaderboard};
pub use stats::{format_statistics, load_statistics, print_statistics, CrawlStatistics};

use crate::storage::Storage;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes the leaderboard of every stored summary and returns its size
pub fn export_leaderboard(storage: &dyn Storage, output_path: &Path) -> OutputResult<usize> {
    let records = storage.get_leaderboard(None)?;
    generate_markdown_leaderboard(&records, output_path)?;
    tracing::info!(
        "Wrote leaderboard of {} players to {}",
        records.len(),
        output_path.display()
    );
    Ok(records.len())
}
