//! Match analysis
//!
//! This module turns raw match payloads into per-match player metrics and
//! per-player summaries, and harvests the other participants of each match as
//! crawl candidates.

mod aggregator;
pub mod metrics;

pub use aggregator::{collect_discoveries, evaluate_match, Analysis, MatchAggregator, MatchRejection};
pub use metrics::{impact_score, summarize, ImpactInputs, TeamTotals};

use crate::api::PlayerIdentity;

/// Metrics for one player in one validated match
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMatchStats {
    pub match_id: String,
    pub player_id: String,
    pub champion: String,
    pub role: Option<String>,
    pub lane: Option<String>,

    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub kda: f64,

    pub kill_participation: f64,
    pub kill_share: f64,
    pub damage_share: f64,

    pub damage: i64,
    pub damage_per_minute: f64,
    pub gold: i64,
    pub gold_per_minute: f64,

    pub cs: i64,
    pub cs_per_minute: f64,

    pub vision_score: i64,
    pub vision_per_minute: f64,
    pub wards_placed: i64,
    pub wards_killed: i64,

    pub damage_to_objectives: i64,
    pub damage_taken: i64,
    pub damage_taken_per_minute: f64,

    pub turret_kills: i64,
    pub dragon_kills: i64,
    pub baron_kills: i64,
    pub herald_kills: i64,

    pub double_kills: i64,
    pub triple_kills: i64,
    pub quadra_kills: i64,
    pub penta_kills: i64,

    /// Game length in seconds
    pub game_duration: i64,
    pub win: bool,
    pub impact_score: f64,

    /// Start time in epoch milliseconds
    pub match_timestamp: Option<i64>,
}

/// Averages over exactly the requested number of validated matches
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_kda: f64,
    /// Percentage of wins, 0-100
    pub win_rate: f64,
    pub avg_dpm: f64,
    pub avg_gpm: f64,
    pub avg_cs_per_minute: f64,
    pub avg_impact_score: f64,
    pub avg_damage: f64,
    pub avg_vision_score: f64,
    pub avg_cs: f64,
    pub avg_gold: f64,

    /// Shard of the first requested match id
    pub region: Option<String>,
    pub matches_count: usize,
}

/// A player seen in someone else's match, not yet processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryCandidate {
    pub opaque_id: String,
    pub display_name: String,
    pub tag: String,
    /// Shard of the match the player was found in; None for seeds
    pub region_hint: Option<String>,
}

impl DiscoveryCandidate {
    /// A seed candidate: resolved directly, with no region hint
    pub fn from_identity(identity: PlayerIdentity) -> Self {
        Self {
            opaque_id: identity.opaque_id,
            display_name: identity.display_name,
            tag: identity.tag,
            region_hint: None,
        }
    }

    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity {
            display_name: self.display_name.clone(),
            tag: self.tag.clone(),
            opaque_id: self.opaque_id.clone(),
        }
    }
}
