//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::analysis::{PlayerMatchStats, PlayerSummary};
use crate::api::PlayerIdentity;
use crate::storage::{RunRecord, RunStatus, SummaryRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// All writes are upserts, so persisting the same profile twice leaves the
/// store unchanged apart from update timestamps.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Records the final status and counters of a run
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        processed: u64,
        inserted: u64,
        stop_reason: Option<&str>,
    ) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Profile Persistence =====

    /// Inserts or updates a player identity keyed by opaque id
    fn upsert_player(&mut self, identity: &PlayerIdentity) -> StorageResult<()>;

    /// Inserts or updates match rows keyed by (match id, player id)
    fn upsert_matches(&mut self, batch: &[PlayerMatchStats]) -> StorageResult<()>;

    /// Inserts or updates a player's summary keyed by opaque id
    fn upsert_summary(&mut self, puuid: &str, summary: &PlayerSummary) -> StorageResult<()>;

    /// Persists an accepted profile: identity, batch and summary
    ///
    /// Backends that support transactions should override this so a profile is
    /// never half-written.
    fn persist_profile(
        &mut self,
        identity: &PlayerIdentity,
        batch: &[PlayerMatchStats],
        summary: &PlayerSummary,
    ) -> StorageResult<()> {
        self.upsert_player(identity)?;
        self.upsert_matches(batch)?;
        self.upsert_summary(&identity.opaque_id, summary)
    }

    // ===== Statistics =====

    fn count_players(&self) -> StorageResult<u64>;

    fn count_matches(&self) -> StorageResult<u64>;

    fn count_summaries(&self) -> StorageResult<u64>;

    /// Summary counts per region, sorted by region; unknown regions are omitted
    fn summaries_by_region(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Summaries ordered by average KDA, best first
    fn get_leaderboard(&self, limit: Option<usize>) -> StorageResult<Vec<SummaryRecord>>;
}
