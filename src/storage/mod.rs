//! Storage module for persisting crawl results
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Player identity, match and summary upserts
//! - Run bookkeeping

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::RiftError;

use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, RiftError> {
    SqliteStorage::new(path)
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub processed: u64,
    pub inserted: u64,
    pub stop_reason: Option<String>,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Ended on a target, the ceiling or an empty frontier
    Completed,
    /// Ended by the operator at cap exhaustion
    Stopped,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "stopped" => Some(Self::Stopped),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A stored player summary joined with the player's identity
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub puuid: String,
    pub display_name: String,
    pub tag: String,
    pub region: Option<String>,
    pub matches_count: u32,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_kda: f64,
    pub win_rate: f64,
    pub avg_dpm: f64,
    pub avg_gpm: f64,
    pub avg_cs_per_minute: f64,
    pub avg_impact_score: f64,
    pub avg_damage: f64,
    pub avg_vision_score: f64,
    pub avg_cs: f64,
    pub avg_gold: f64,
    pub updated_at: String,
}
