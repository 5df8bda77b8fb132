//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::storage::{RunRecord, Storage};
use crate::RiftError;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Players with a stored identity
    pub players: u64,

    /// Stored (match, player) rows
    pub matches: u64,

    /// Players with a complete summary
    pub summaries: u64,

    /// Summary counts per region, sorted by region
    pub summaries_by_region: Vec<(String, u64)>,

    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, RiftError> {
    Ok(CrawlStatistics {
        players: storage.count_players()?,
        matches: storage.count_matches()?,
        summaries: storage.count_summaries()?,
        summaries_by_region: storage.summaries_by_region()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Formats statistics as plain text
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Players stored: {}\n", stats.players));
    out.push_str(&format!("  Match rows stored: {}\n", stats.matches));
    out.push_str(&format!("  Player summaries: {}\n", stats.summaries));
    out.push('\n');

    if !stats.summaries_by_region.is_empty() {
        out.push_str("Summaries by Region:\n");
        for (region, count) in &stats.summaries_by_region {
            let percentage = if stats.summaries > 0 {
                (*count as f64 / stats.summaries as f64) * 100.0
            } else {
                0.0
            };
            out.push_str(&format!("  {}: {} ({:.1}%)\n", region, count, percentage));
        }
        out.push('\n');
    }

    match &stats.latest_run {
        Some(run) => {
            out.push_str("Latest Run:\n");
            out.push_str(&format!("  ID: {}\n", run.id));
            out.push_str(&format!("  Started: {}\n", run.started_at));
            if let Some(finished) = &run.finished_at {
                out.push_str(&format!("  Finished: {}\n", finished));
            }
            out.push_str(&format!("  Status: {}\n", run.status.to_db_string()));
            out.push_str(&format!(
                "  Processed: {} | Inserted: {}\n",
                run.processed, run.inserted
            ));
            if let Some(reason) = &run.stop_reason {
                out.push_str(&format!("  Stop reason: {}\n", reason));
            }
        }
        None => out.push_str("No crawl runs recorded\n"),
    }

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
