//! Batch analysis of a player's recent matches
//!
//! A player's batch is all-or-nothing: a summary exists only when every one of
//! the requested matches was fetched and validated. A shortfall discards the
//! parsed matches too, so small samples never reach storage.

use crate::analysis::metrics::{impact_score, kda, per_minute, share, summarize, team_totals, ImpactInputs};
use crate::analysis::{DiscoveryCandidate, PlayerMatchStats, PlayerSummary};
use crate::api::models::{region_shard, short_id, MatchDto};
use crate::api::{fetch_match_detail, ApiClient, MatchIndexFetcher};
use crate::RiftError;
use std::collections::HashSet;
use url::Url;

/// Why a fetched match was not counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRejection {
    /// Duration missing or not positive
    InvalidDuration,
    /// The analyzed player is not among the participants
    PlayerAbsent,
}

/// Result of analyzing one player
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Per-match stats; empty unless the batch was complete
    pub batch: Vec<PlayerMatchStats>,

    /// Other participants found along the way
    pub discoveries: Vec<DiscoveryCandidate>,

    /// Present iff exactly `wanted` matches validated
    pub summary: Option<PlayerSummary>,

    /// Number of matches that passed validation
    pub validated: usize,

    /// Number of matches requested
    pub wanted: usize,
}

impl Analysis {
    fn empty(wanted: usize) -> Self {
        Self {
            wanted,
            ..Default::default()
        }
    }

    /// Describes why no summary was produced, if it wasn't
    pub fn shortfall(&self) -> Option<RiftError> {
        if self.summary.is_some() {
            None
        } else {
            Some(RiftError::IncompleteBatch {
                validated: self.validated,
                wanted: self.wanted,
            })
        }
    }
}

/// Fetches, validates and scores a player's recent matches
pub struct MatchAggregator<'a> {
    client: &'a ApiClient,
    index: MatchIndexFetcher<'a>,
}

impl<'a> MatchAggregator<'a> {
    pub fn new(client: &'a ApiClient, endpoints: &'a [Url]) -> Self {
        Self {
            client,
            index: MatchIndexFetcher::new(client, endpoints),
        }
    }

    /// Analyzes the last `want_count` matches of a player
    ///
    /// # Pipeline
    ///
    /// 1. Find match ids (see [`MatchIndexFetcher::fetch`]); fewer than
    ///    `want_count` ids ends the analysis immediately, as does a zero
    ///    `want_count`
    /// 2. Per match: fetch detail, skip on failure
    /// 3. Skip matches with missing or non-positive duration
    /// 4. Harvest other participants if `collect_discovery`
    /// 5. Locate the player and compute metrics, skip if absent
    /// 6. Summarize only if every match validated
    pub async fn analyze(&self, puuid: &str, want_count: usize, collect_discovery: bool) -> Analysis {
        if want_count == 0 {
            return Analysis::empty(0);
        }

        let Some(index) = self.index.fetch(puuid, want_count).await else {
            return Analysis::empty(want_count);
        };

        if index.match_ids.len() < want_count {
            tracing::info!(
                "Only found {} matches (need {}), skipping player",
                index.match_ids.len(),
                want_count
            );
            return Analysis::empty(want_count);
        }

        let match_ids = &index.match_ids[..want_count];
        let mut analysis = Analysis::empty(want_count);
        let mut seen_discovered = HashSet::new();
        let mut games = Vec::with_capacity(want_count);

        for (i, match_id) in match_ids.iter().enumerate() {
            let detail = match fetch_match_detail(self.client, &index.endpoint, match_id).await {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::info!("Failed to get match detail for {}, skipping: {}", match_id, e);
                    continue;
                }
            };

            let evaluated = evaluate_match(match_id, &detail, puuid);
            if evaluated == Err(MatchRejection::InvalidDuration) {
                tracing::info!("Invalid duration for {}, skipping", match_id);
                continue;
            }

            if collect_discovery {
                collect_discoveries(
                    match_id,
                    &detail,
                    puuid,
                    &mut seen_discovered,
                    &mut analysis.discoveries,
                );
            }

            match evaluated {
                Ok(game) => {
                    tracing::info!(
                        "Game {} ({}): {} | {}/{}/{} KDA={:.2} | win={}",
                        i + 1,
                        match_id,
                        game.champion,
                        game.kills,
                        game.deaths,
                        game.assists,
                        game.kda,
                        game.win
                    );
                    tracing::debug!(
                        "CS/min={:.2}, DPM={:.0}, GPM={:.0}, KP={:.1}%, DmgShare={:.1}%",
                        game.cs_per_minute,
                        game.damage_per_minute,
                        game.gold_per_minute,
                        game.kill_participation * 100.0,
                        game.damage_share * 100.0
                    );
                    games.push(game);
                }
                Err(_) => {
                    tracing::info!(
                        "Could not find puuid={}... in match {}",
                        short_id(puuid),
                        match_id
                    );
                }
            }
        }

        analysis.validated = games.len();
        if games.len() != want_count {
            tracing::info!(
                "Only {} valid matches parsed (need {}), skipping player",
                games.len(),
                want_count
            );
            return analysis;
        }

        let region = match_ids
            .first()
            .and_then(|id| region_shard(id))
            .map(str::to_string);
        analysis.summary = summarize(&games, region);
        analysis.batch = games;

        if let Some(summary) = &analysis.summary {
            tracing::info!(
                "Summary of last {} games: KDA={:.2} winrate={:.1}% impact={:.3} region={}",
                summary.matches_count,
                summary.avg_kda,
                summary.win_rate,
                summary.avg_impact_score,
                summary.region.as_deref().unwrap_or("-")
            );
        }

        analysis
    }
}

/// Validates one match and computes the player's metrics in it
pub fn evaluate_match(
    match_id: &str,
    detail: &MatchDto,
    puuid: &str,
) -> Result<PlayerMatchStats, MatchRejection> {
    let info = &detail.info;
    let duration = info.valid_duration().ok_or(MatchRejection::InvalidDuration)?;
    let me = info.participant(puuid).ok_or(MatchRejection::PlayerAbsent)?;

    let teams = team_totals(&info.participants);
    let team = me
        .team_id
        .and_then(|id| teams.get(&id).copied())
        .unwrap_or_default();

    let minutes = duration as f64 / 60.0;
    let cs = me.cs();
    let damage = me.total_damage_dealt_to_champions;

    let kill_participation = share(me.kills + me.assists, team.kills);
    let kill_share = share(me.kills, team.kills);
    let damage_share = share(damage, team.damage);

    let cs_per_minute = per_minute(cs, minutes);
    let gold_per_minute = per_minute(me.gold_earned, minutes);
    let vision_per_minute = per_minute(me.vision_score, minutes);

    let impact = impact_score(&ImpactInputs {
        damage_share,
        kill_participation,
        vision_per_minute,
        cs_per_minute,
        gold_per_minute,
        win: me.win,
    });

    Ok(PlayerMatchStats {
        match_id: match_id.to_string(),
        player_id: puuid.to_string(),
        champion: me.champion().to_string(),
        role: me.role(),
        lane: me.lane(),
        kills: me.kills,
        deaths: me.deaths,
        assists: me.assists,
        kda: kda(me.kills, me.deaths, me.assists),
        kill_participation,
        kill_share,
        damage_share,
        damage,
        damage_per_minute: per_minute(damage, minutes),
        gold: me.gold_earned,
        gold_per_minute,
        cs,
        cs_per_minute,
        vision_score: me.vision_score,
        vision_per_minute,
        wards_placed: me.wards_placed,
        wards_killed: me.wards_killed,
        damage_to_objectives: me.damage_dealt_to_objectives,
        damage_taken: me.total_damage_taken,
        damage_taken_per_minute: per_minute(me.total_damage_taken, minutes),
        turret_kills: me.turret_kills,
        dragon_kills: me.dragon_kills,
        baron_kills: me.baron_kills,
        herald_kills: me.rift_herald_kills,
        double_kills: me.double_kills,
        triple_kills: me.triple_kills,
        quadra_kills: me.quadra_kills,
        penta_kills: me.penta_kills,
        game_duration: duration,
        win: me.win,
        impact_score: impact,
        match_timestamp: info.timestamp(),
    })
}

/// Appends every other participant not yet seen in this analysis
pub fn collect_discoveries(
    match_id: &str,
    detail: &MatchDto,
    puuid: &str,
    seen: &mut HashSet<String>,
    out: &mut Vec<DiscoveryCandidate>,
) {
    let region_hint = region_shard(match_id).map(str::to_string);

    for p in &detail.info.participants {
        let Some(other) = p.puuid.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        if other == puuid || !seen.insert(other.to_string()) {
            continue;
        }

        out.push(DiscoveryCandidate {
            opaque_id: other.to_string(),
            display_name: p.display_name().to_string(),
            tag: p.tag().to_string(),
            region_hint: region_hint.clone(),
        });
    }
}
