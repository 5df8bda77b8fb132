//! Structured records for the upstream payloads
//!
//! Only the fields the crawler consumes are modeled. Missing numeric counters
//! default to zero, missing flags to false, and missing identity fields to None.

use serde::Deserialize;

/// Display name used when a participant carries no usable name
pub const UNKNOWN_NAME: &str = "Unknown";

/// Tag used when a participant carries no usable tag
pub const DEFAULT_TAG: &str = "NA1";

/// Account lookup response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountDto {
    pub puuid: Option<String>,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

/// Match detail response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchDto {
    pub info: MatchInfo,
}

/// Match metadata and participants
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchInfo {
    /// Game length in seconds
    pub game_duration: Option<i64>,
    pub game_start_timestamp: Option<i64>,
    pub game_creation: Option<i64>,
    pub participants: Vec<ParticipantDto>,
}

impl MatchInfo {
    /// Duration in seconds, if present and positive
    pub fn valid_duration(&self) -> Option<i64> {
        self.game_duration.filter(|d| *d > 0)
    }

    /// Start timestamp, falling back to the creation timestamp
    pub fn timestamp(&self) -> Option<i64> {
        self.game_start_timestamp
            .filter(|ts| *ts != 0)
            .or(self.game_creation.filter(|ts| *ts != 0))
    }

    /// Finds the participant record for a player
    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.participants
            .iter()
            .find(|p| p.puuid.as_deref() == Some(puuid))
    }
}

/// One participant of a match
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantDto {
    pub puuid: Option<String>,
    pub riot_id_game_name: Option<String>,
    pub riot_id_tagline: Option<String>,
    pub summoner_name: Option<String>,
    pub team_id: Option<i64>,
    pub win: bool,
    pub champion_name: Option<String>,
    pub team_position: Option<String>,
    pub lane: Option<String>,

    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,

    pub total_minions_killed: i64,
    pub neutral_minions_killed: i64,
    pub gold_earned: i64,
    pub total_damage_dealt_to_champions: i64,
    pub total_damage_taken: i64,
    pub damage_dealt_to_objectives: i64,

    pub vision_score: i64,
    pub wards_placed: i64,
    pub wards_killed: i64,

    pub turret_kills: i64,
    pub dragon_kills: i64,
    pub baron_kills: i64,
    pub rift_herald_kills: i64,

    pub double_kills: i64,
    pub triple_kills: i64,
    pub quadra_kills: i64,
    pub penta_kills: i64,
}

impl ParticipantDto {
    /// Best available display name: Riot ID name, then summoner name
    pub fn display_name(&self) -> &str {
        non_empty(&self.riot_id_game_name)
            .or(non_empty(&self.summoner_name))
            .unwrap_or(UNKNOWN_NAME)
    }

    /// Best available tag
    pub fn tag(&self) -> &str {
        non_empty(&self.riot_id_tagline).unwrap_or(DEFAULT_TAG)
    }

    pub fn champion(&self) -> &str {
        non_empty(&self.champion_name).unwrap_or(UNKNOWN_NAME)
    }

    /// Creep score: lane minions plus neutral monsters
    pub fn cs(&self) -> i64 {
        self.total_minions_killed + self.neutral_minions_killed
    }

    pub fn role(&self) -> Option<String> {
        non_empty(&self.team_position).map(str::to_string)
    }

    pub fn lane(&self) -> Option<String> {
        non_empty(&self.lane).map(str::to_string)
    }
}

/// Region shard encoded in a match id: everything before the first `_`
///
/// `NA1_4512345678` → `NA1`. An id without a separator is its own shard.
pub fn region_shard(match_id: &str) -> Option<&str> {
    match_id.split('_').next().filter(|s| !s.is_empty())
}

/// Shortened player id for log lines
pub fn short_id(puuid: &str) -> &str {
    puuid.get(..10).unwrap_or(puuid)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
