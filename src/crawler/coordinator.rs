//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from configured players
//! - Driving match analysis for each dequeued candidate
//! - Applying region caps to acceptance and expansion
//! - Persisting accepted profiles and run bookkeeping
//! - Asking for a decision when every region is capped

use crate::analysis::{Analysis, DiscoveryCandidate, MatchAggregator};
use crate::api::{short_id, AccountResolver, ApiClient};
use crate::config::{Config, SeedEntry};
use crate::crawler::decision::{decider_for, format_counts, CapDecider, CapDecision};
use crate::crawler::frontier::Frontier;
use crate::storage::{RunStatus, Storage};
use crate::{ConfigError, Result};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Inserted players reached the target
    TargetReached,
    /// Processed players reached the ceiling
    ProcessedCeiling,
    /// Nothing left to process
    FrontierExhausted,
    /// The operator declined to continue at cap exhaustion
    OperatorStopped,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TargetReached => "target reached",
            Self::ProcessedCeiling => "processed ceiling reached",
            Self::FrontierExhausted => "frontier exhausted",
            Self::OperatorStopped => "operator stopped",
        }
    }

    fn run_status(&self) -> RunStatus {
        match self {
            Self::OperatorStopped => RunStatus::Stopped,
            _ => RunStatus::Completed,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one dequeued candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Hinted region was capped; not analyzed and not counted as processed
    Skipped { region: Option<String> },
    /// Analyzed but without a complete batch
    NotInserted { discovered: usize },
    /// Complete batch, but its region was already capped
    Rejected {
        region: Option<String>,
        discovered: usize,
    },
    /// Profile persisted
    Inserted {
        region: Option<String>,
        discovered: usize,
    },
}

/// Final counters of a crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub processed: u64,
    pub inserted: u64,
    /// Candidates still queued when the run ended
    pub remaining: usize,
    pub region_counts: BTreeMap<String, u32>,
    pub stop_reason: StopReason,
}

/// Breadth-first player crawler
pub struct Crawler<S: Storage> {
    client: ApiClient,
    storage: S,
    decider: Box<dyn CapDecider>,
    frontier: Frontier,
    account_base: Url,
    endpoints: Vec<Url>,
    matches_per_player: usize,
    target_inserted: u64,
    max_processed: u64,
    config_hash: String,
    processed: u64,
    inserted: u64,
    operator_stopped: bool,
}

impl<S: Storage> Crawler<S> {
    /// Creates a crawler with an empty frontier
    ///
    /// The cap decider follows the configured policy; override it with
    /// [`Crawler::with_decider`].
    pub fn new(config: &Config, client: ApiClient, storage: S) -> Result<Self> {
        let account_base = parse_base(&config.api.account_base)?;
        let endpoints = config
            .api
            .regional_bases
            .iter()
            .map(|base| parse_base(base))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            client,
            storage,
            decider: decider_for(config.crawler.on_cap_exhausted),
            frontier: Frontier::new(config.crawler.region_cap),
            account_base,
            endpoints,
            matches_per_player: config.crawler.matches_per_player,
            target_inserted: config.crawler.target_inserted_players,
            max_processed: config.crawler.max_processed_players,
            config_hash: String::new(),
            processed: 0,
            inserted: 0,
            operator_stopped: false,
        })
    }

    pub fn with_decider(mut self, decider: impl CapDecider + 'static) -> Self {
        self.decider = Box::new(decider);
        self
    }

    /// Sets the hash recorded with the run
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = hash.into();
        self
    }

    /// Resolves seed players and enqueues them with no region hint
    ///
    /// Seeds that fail to resolve are logged and skipped. Returns the number
    /// of seeds enqueued.
    pub async fn seed(&mut self, seeds: &[SeedEntry]) -> usize {
        tracing::info!("Seeding queue from {} configured players", seeds.len());

        let resolver = AccountResolver::new(&self.client, &self.account_base);
        let mut added = 0;

        for seed in seeds {
            let identity = match resolver.resolve(&seed.name, &seed.tag).await {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::warn!("Could not resolve seed {}#{}: {}", seed.name, seed.tag, e);
                    continue;
                }
            };

            let label = format!("{}#{}", identity.display_name, identity.tag);
            let short = short_id(&identity.opaque_id).to_string();
            if self
                .frontier
                .enqueue(DiscoveryCandidate::from_identity(identity))
            {
                tracing::info!("Seeded {} (puuid={}...)", label, short);
                added += 1;
            }
        }

        tracing::info!("Initial queue size: {} players", self.frontier.len());
        added
    }

    /// Processes the next candidate; returns None if the frontier is empty
    pub async fn step(&mut self) -> Result<Option<StepOutcome>> {
        let Some(candidate) = self.frontier.pop() else {
            return Ok(None);
        };

        if self
            .frontier
            .quota()
            .is_capped(candidate.region_hint.as_deref())
        {
            tracing::info!(
                "Skipping {}#{} (hint region={}): region cap reached",
                candidate.display_name,
                candidate.tag,
                candidate.region_hint.as_deref().unwrap_or("-")
            );
            return Ok(Some(StepOutcome::Skipped {
                region: candidate.region_hint,
            }));
        }

        tracing::info!(
            "Processing {}#{} (puuid={}...) | queue={} inserted={} processed={} | regions: {}",
            candidate.display_name,
            candidate.tag,
            short_id(&candidate.opaque_id),
            self.frontier.len(),
            self.inserted,
            self.processed,
            format_counts(self.frontier.quota().counts())
        );

        let analysis = MatchAggregator::new(&self.client, &self.endpoints)
            .analyze(&candidate.opaque_id, self.matches_per_player, true)
            .await;

        let outcome = self.apply_analysis(&candidate, analysis)?;
        self.check_cap_exhaustion();

        Ok(Some(outcome))
    }

    /// Applies region caps to an analysis, persists it if accepted, and
    /// enqueues qualifying discoveries
    ///
    /// Counts the candidate as processed. Storage failures are returned.
    pub fn apply_analysis(
        &mut self,
        candidate: &DiscoveryCandidate,
        analysis: Analysis,
    ) -> Result<StepOutcome> {
        self.processed += 1;

        let shortfall = analysis.shortfall();
        let Analysis {
            batch,
            discoveries,
            summary,
            ..
        } = analysis;

        let Some(summary) = summary else {
            if let Some(reason) = shortfall {
                tracing::info!("Not inserting {}: {}", candidate.display_name, reason);
            }
            let discovered = self.frontier.offer_discoveries(discoveries);
            return Ok(StepOutcome::NotInserted { discovered });
        };

        let region = summary.region.clone();
        if self.frontier.quota().is_capped(region.as_deref()) {
            tracing::info!(
                "Region {} already reached cap ({}), not inserting {}",
                region.as_deref().unwrap_or("-"),
                self.frontier.quota().cap(),
                candidate.display_name
            );
            let discovered = self.frontier.offer_discoveries(discoveries);
            return Ok(StepOutcome::Rejected { region, discovered });
        }

        self.storage
            .persist_profile(&candidate.identity(), &batch, &summary)?;
        self.inserted += 1;

        match &region {
            Some(r) => self.frontier.quota_mut().record_insert(r),
            None => tracing::info!("No region shard detected, inserted without region cap"),
        }

        tracing::info!(
            "Inserted {}#{} with {} matches, region={}, counts: {}",
            candidate.display_name,
            candidate.tag,
            batch.len(),
            region.as_deref().unwrap_or("-"),
            format_counts(self.frontier.quota().counts())
        );

        let discovered = self.frontier.offer_discoveries(discoveries);
        Ok(StepOutcome::Inserted { region, discovered })
    }

    fn check_cap_exhaustion(&mut self) {
        if !self.frontier.quota().all_capped() {
            return;
        }

        let cap = self.frontier.quota().cap();
        tracing::warn!(
            "All currently seen regions reached the cap of {}: {}",
            cap,
            format_counts(self.frontier.quota().counts())
        );

        match self.decider.decide(self.frontier.quota().counts(), cap) {
            CapDecision::Continue => {
                self.frontier.quota_mut().reset();
                tracing::info!("Region counts reset, continuing with fresh caps");
            }
            CapDecision::Stop => {
                tracing::info!("Stopping as requested");
                self.operator_stopped = true;
            }
        }
    }

    /// Returns the reason to stop before the next step, if any
    pub fn should_stop(&self) -> Option<StopReason> {
        if self.operator_stopped {
            Some(StopReason::OperatorStopped)
        } else if self.inserted >= self.target_inserted {
            Some(StopReason::TargetReached)
        } else if self.processed >= self.max_processed {
            Some(StopReason::ProcessedCeiling)
        } else if self.frontier.is_empty() {
            Some(StopReason::FrontierExhausted)
        } else {
            None
        }
    }

    /// Runs steps until a stop condition holds
    ///
    /// The run is recorded in storage. A storage failure ends the run as
    /// failed and is returned.
    pub async fn run(&mut self) -> Result<CrawlReport> {
        let run_id = self.storage.create_run(&self.config_hash)?;
        tracing::info!("Starting crawl run {}", run_id);
        let start_time = std::time::Instant::now();

        let stop_reason = loop {
            if let Some(reason) = self.should_stop() {
                break reason;
            }

            if let Err(e) = self.step().await {
                tracing::error!("Crawl run {} failed: {}", run_id, e);
                let message = e.to_string();
                self.storage.finish_run(
                    run_id,
                    RunStatus::Failed,
                    self.processed,
                    self.inserted,
                    Some(&message),
                )?;
                return Err(e);
            }
        };

        self.storage.finish_run(
            run_id,
            stop_reason.run_status(),
            self.processed,
            self.inserted,
            Some(stop_reason.as_str()),
        )?;

        tracing::info!(
            "Crawl finished ({}): {} processed, {} inserted, {} left in queue, in {:?}",
            stop_reason,
            self.processed,
            self.inserted,
            self.frontier.len(),
            start_time.elapsed()
        );

        Ok(self.report(stop_reason))
    }

    fn report(&self, stop_reason: StopReason) -> CrawlReport {
        CrawlReport {
            processed: self.processed,
            inserted: self.inserted,
            remaining: self.frontier.len(),
            region_counts: self.frontier.quota().counts().clone(),
            stop_reason,
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn parse_base(raw: &str) -> std::result::Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{PlayerMatchStats, PlayerSummary};
    use crate::config::{ApiConfig, CapPolicy, CrawlerConfig, OutputConfig};
    use crate::crawler::decision::FixedDecision;
    use crate::storage::SqliteStorage;

    fn create_test_config(region_cap: u32) -> Config {
        Config {
            api: ApiConfig {
                api_key_env: "RIOT_API_KEY".to_string(),
                account_base: "https://americas.api.riotgames.com".to_string(),
                regional_bases: vec!["https://europe.api.riotgames.com".to_string()],
                requests_per_window: 1000,
                window_seconds: 1,
                request_timeout_secs: 5,
                default_retry_after_secs: 0,
            },
            crawler: CrawlerConfig {
                matches_per_player: 1,
                target_inserted_players: 100,
                max_processed_players: 100,
                region_cap,
                on_cap_exhausted: CapPolicy::Stop,
            },
            output: OutputConfig {
                database_path: ":memory:".to_string(),
                leaderboard_path: "./leaderboard.md".to_string(),
            },
            seeds: vec![],
        }
    }

    fn create_crawler(region_cap: u32) -> Crawler<SqliteStorage> {
        let config = create_test_config(region_cap);
        let client = ApiClient::new(&config.api, "k").unwrap();
        let storage = SqliteStorage::new_in_memory().unwrap();
        Crawler::new(&config, client, storage).unwrap()
    }

    fn candidate(id: &str, hint: Option<&str>) -> DiscoveryCandidate {
        DiscoveryCandidate {
            opaque_id: id.to_string(),
            display_name: format!("name-{}", id),
            tag: "TAG".to_string(),
            region_hint: hint.map(str::to_string),
        }
    }

    fn game(player: &str) -> PlayerMatchStats {
        PlayerMatchStats {
            match_id: format!("NA1_{}", player),
            player_id: player.to_string(),
            champion: "Ahri".to_string(),
            role: None,
            lane: None,
            kills: 1,
            deaths: 1,
            assists: 1,
            kda: 2.0,
            kill_participation: 0.0,
            kill_share: 0.0,
            damage_share: 0.0,
            damage: 0,
            damage_per_minute: 0.0,
            gold: 0,
            gold_per_minute: 0.0,
            cs: 0,
            cs_per_minute: 0.0,
            vision_score: 0,
            vision_per_minute: 0.0,
            wards_placed: 0,
            wards_killed: 0,
            damage_to_objectives: 0,
            damage_taken: 0,
            damage_taken_per_minute: 0.0,
            turret_kills: 0,
            dragon_kills: 0,
            baron_kills: 0,
            herald_kills: 0,
            double_kills: 0,
            triple_kills: 0,
            quadra_kills: 0,
            penta_kills: 0,
            game_duration: 1200,
            win: false,
            impact_score: 0.0,
            match_timestamp: None,
        }
    }

    fn complete(player: &str, region: Option<&str>, discoveries: Vec<DiscoveryCandidate>) -> Analysis {
        Analysis {
            batch: vec![game(player)],
            discoveries,
            summary: Some(PlayerSummary {
                avg_kills: 1.0,
                avg_deaths: 1.0,
                avg_assists: 1.0,
                avg_kda: 2.0,
                win_rate: 0.0,
                avg_dpm: 0.0,
                avg_gpm: 0.0,
                avg_cs_per_minute: 0.0,
                avg_impact_score: 0.0,
                avg_damage: 0.0,
                avg_vision_score: 0.0,
                avg_cs: 0.0,
                avg_gold: 0.0,
                region: region.map(str::to_string),
                matches_count: 1,
            }),
            validated: 1,
            wanted: 1,
        }
    }

    fn incomplete(discoveries: Vec<DiscoveryCandidate>) -> Analysis {
        Analysis {
            discoveries,
            validated: 0,
            wanted: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_records_region_and_enqueues_discoveries() {
        let mut crawler = create_crawler(5);

        let outcome = crawler
            .apply_analysis(
                &candidate("p1", None),
                complete("p1", Some("NA1"), vec![candidate("d1", Some("NA1"))]),
            )
            .unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Inserted {
                region: Some("NA1".to_string()),
                discovered: 1
            }
        );
        assert_eq!(crawler.inserted(), 1);
        assert_eq!(crawler.processed(), 1);
        assert_eq!(crawler.frontier().quota().count("NA1"), 1);
        assert_eq!(crawler.storage().count_summaries().unwrap(), 1);
        assert_eq!(crawler.frontier().len(), 1);
    }

    #[test]
    fn test_incomplete_batch_still_expands() {
        let mut crawler = create_crawler(5);

        let outcome = crawler
            .apply_analysis(
                &candidate("p1", None),
                incomplete(vec![candidate("d1", Some("KR")), candidate("d2", None)]),
            )
            .unwrap();

        assert_eq!(outcome, StepOutcome::NotInserted { discovered: 2 });
        assert_eq!(crawler.inserted(), 0);
        assert_eq!(crawler.processed(), 1);
        assert_eq!(crawler.storage().count_players().unwrap(), 0);
    }

    #[test]
    fn test_capped_region_rejects_but_expands() {
        let mut crawler = create_crawler(1);
        crawler
            .apply_analysis(&candidate("p1", None), complete("p1", Some("NA1"), vec![]))
            .unwrap();

        let outcome = crawler
            .apply_analysis(
                &candidate("p2", None),
                complete(
                    "p2",
                    Some("NA1"),
                    vec![candidate("na", Some("NA1")), candidate("eu", Some("EUW1"))],
                ),
            )
            .unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Rejected {
                region: Some("NA1".to_string()),
                discovered: 1
            }
        );
        assert_eq!(crawler.inserted(), 1);
        assert_eq!(crawler.frontier().quota().count("NA1"), 1);
        assert_eq!(crawler.storage().count_players().unwrap(), 1);
        assert!(!crawler.frontier().has_seen("na"));
        assert!(crawler.frontier().has_seen("eu"));
    }

    #[test]
    fn test_summary_without_region_ignores_caps() {
        let mut crawler = create_crawler(1);

        for id in ["a", "b", "c"] {
            let outcome = crawler
                .apply_analysis(&candidate(id, None), complete(id, None, vec![]))
                .unwrap();
            assert!(matches!(outcome, StepOutcome::Inserted { region: None, .. }));
        }

        assert_eq!(crawler.inserted(), 3);
        assert!(crawler.frontier().quota().counts().is_empty());
    }

    #[test]
    fn test_cap_exhaustion_stop() {
        let mut crawler = create_crawler(1).with_decider(FixedDecision(CapDecision::Stop));
        crawler.frontier.enqueue(candidate("queued", None));

        crawler
            .apply_analysis(&candidate("p1", None), complete("p1", Some("NA1"), vec![]))
            .unwrap();
        crawler.check_cap_exhaustion();

        assert_eq!(crawler.should_stop(), Some(StopReason::OperatorStopped));
        assert_eq!(crawler.frontier().len(), 1);
    }

    #[test]
    fn test_cap_exhaustion_continue_resets() {
        let mut crawler = create_crawler(1).with_decider(FixedDecision(CapDecision::Continue));
        crawler.frontier.enqueue(candidate("queued", None));

        crawler
            .apply_analysis(&candidate("p1", None), complete("p1", Some("NA1"), vec![]))
            .unwrap();
        crawler.check_cap_exhaustion();

        assert!(crawler.frontier().quota().counts().is_empty());
        assert_eq!(crawler.should_stop(), None);
    }

    #[test]
    fn test_stop_conditions() {
        let mut crawler = create_crawler(5);
        assert_eq!(crawler.should_stop(), Some(StopReason::FrontierExhausted));

        crawler.frontier.enqueue(candidate("q", None));
        assert_eq!(crawler.should_stop(), None);

        crawler.processed = 100;
        assert_eq!(crawler.should_stop(), Some(StopReason::ProcessedCeiling));

        crawler.inserted = 100;
        assert_eq!(crawler.should_stop(), Some(StopReason::TargetReached));
    }

    #[tokio::test]
    async fn test_step_skips_capped_hint_without_processing() {
        let mut crawler = create_crawler(1);
        crawler.frontier.quota_mut().record_insert("EUW1");
        crawler.frontier.enqueue(candidate("x", Some("EUW1")));

        let outcome = crawler.step().await.unwrap();

        assert_eq!(
            outcome,
            Some(StepOutcome::Skipped {
                region: Some("EUW1".to_string())
            })
        );
        assert_eq!(crawler.processed(), 0);
        assert!(crawler.step().await.unwrap().is_none());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = create_test_config(1);
        config.api.regional_bases = vec!["not a url".to_string()];
        let client = ApiClient::new(&config.api, "k").unwrap();
        let storage = SqliteStorage::new_in_memory().unwrap();

        assert!(Crawler::new(&config, client, storage).is_err());
    }
}
