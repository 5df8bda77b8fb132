//! Per-match metric formulas
//!
//! The impact score weights and divisors are a fixed heuristic and must stay
//! exactly as written so scores remain comparable with stored data.

use crate::analysis::{PlayerMatchStats, PlayerSummary};
use crate::api::models::ParticipantDto;
use std::collections::HashMap;

/// Kill and champion damage totals for one team in one match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamTotals {
    pub kills: i64,
    pub damage: i64,
}

/// Sums kills and champion damage per team id
///
/// Participants without a team id contribute to no team.
pub fn team_totals(participants: &[ParticipantDto]) -> HashMap<i64, TeamTotals> {
    let mut teams: HashMap<i64, TeamTotals> = HashMap::new();
    for p in participants {
        let Some(team_id) = p.team_id else {
            continue;
        };
        let totals = teams.entry(team_id).or_default();
        totals.kills += p.kills;
        totals.damage += p.total_damage_dealt_to_champions;
    }
    teams
}

/// (kills + assists) / deaths, or kills + assists for a deathless game
pub fn kda(kills: i64, deaths: i64, assists: i64) -> f64 {
    let takedowns = (kills + assists) as f64;
    if deaths > 0 {
        takedowns / deaths as f64
    } else {
        takedowns
    }
}

/// `value / total`, or 0.0 when the total is not positive
pub fn share(value: i64, total: i64) -> f64 {
    if total > 0 {
        value as f64 / total as f64
    } else {
        0.0
    }
}

/// Rate per minute; `minutes` must be positive
pub fn per_minute(value: i64, minutes: f64) -> f64 {
    value as f64 / minutes
}

/// Inputs of the composite impact score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpactInputs {
    pub damage_share: f64,
    pub kill_participation: f64,
    pub vision_per_minute: f64,
    pub cs_per_minute: f64,
    pub gold_per_minute: f64,
    pub win: bool,
}

/// Fixed-weight heuristic combining damage, participation, vision, farm, gold and result
pub fn impact_score(inputs: &ImpactInputs) -> f64 {
    let win_factor = if inputs.win { 1.0 } else { 0.0 };

    0.30 * inputs.damage_share
        + 0.25 * inputs.kill_participation
        + 0.15 * (inputs.vision_per_minute / 2.0)
        + 0.10 * (inputs.cs_per_minute / 10.0)
        + 0.10 * (inputs.gold_per_minute / 600.0)
        + 0.10 * win_factor
}

/// Averages a batch of validated matches into a summary
///
/// Returns None for an empty batch.
pub fn summarize(batch: &[PlayerMatchStats], region: Option<String>) -> Option<PlayerSummary> {
    if batch.is_empty() {
        return None;
    }

    let n = batch.len() as f64;
    let mean = |f: fn(&PlayerMatchStats) -> f64| batch.iter().map(f).sum::<f64>() / n;

    Some(PlayerSummary {
        avg_kills: mean(|g| g.kills as f64),
        avg_deaths: mean(|g| g.deaths as f64),
        avg_assists: mean(|g| g.assists as f64),
        avg_kda: mean(|g| g.kda),
        win_rate: mean(|g| if g.win { 100.0 } else { 0.0 }),
        avg_dpm: mean(|g| g.damage_per_minute),
        avg_gpm: mean(|g| g.gold_per_minute),
        avg_cs_per_minute: mean(|g| g.cs_per_minute),
        avg_impact_score: mean(|g| g.impact_score),
        avg_damage: mean(|g| g.damage as f64),
        avg_vision_score: mean(|g| g.vision_score as f64),
        avg_cs: mean(|g| g.cs as f64),
        avg_gold: mean(|g| g.gold as f64),
        region,
        matches_count: batch.len(),
    })
}
