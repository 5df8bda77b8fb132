//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the account and regional match
//! endpoints and run full crawls end-to-end against a temporary database.

use rift_ripple::config::{
    ApiConfig, CapPolicy, Config, CrawlerConfig, OutputConfig, SeedEntry,
};
use rift_ripple::crawler::{run_crawl, CapDecision, Crawler, FixedDecision, StopReason};
use rift_ripple::storage::{RunStatus, SqliteStorage, Storage};
use rift_ripple::ApiClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the given mock servers
fn create_test_config(
    account_base: &str,
    regional_base: &str,
    db_path: &str,
    matches_per_player: usize,
    region_cap: u32,
) -> Config {
    Config {
        api: ApiConfig {
            api_key_env: "RIOT_API_KEY".to_string(),
            account_base: account_base.to_string(),
            regional_bases: vec![regional_base.to_string()],
            requests_per_window: 1000,
            window_seconds: 1, // 1ms spacing
            request_timeout_secs: 5,
            default_retry_after_secs: 0,
        },
        crawler: CrawlerConfig {
            matches_per_player,
            target_inserted_players: 100,
            max_processed_players: 100,
            region_cap,
            on_cap_exhausted: CapPolicy::Stop,
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
            leaderboard_path: "./test_leaderboard.md".to_string(),
        },
        seeds: vec![SeedEntry {
            name: "Alpha".to_string(),
            tag: "EUW".to_string(),
        }],
    }
}

fn participant(puuid: &str, team_id: i64, win: bool) -> Value {
    json!({
        "puuid": puuid,
        "riotIdGameName": format!("{}-name", puuid),
        "riotIdTagline": "TAG",
        "teamId": team_id,
        "championName": "Ahri",
        "kills": 4,
        "deaths": 2,
        "assists": 6,
        "totalMinionsKilled": 170,
        "neutralMinionsKilled": 10,
        "goldEarned": 11000,
        "totalDamageDealtToChampions": 18000,
        "visionScore": 25,
        "win": win,
    })
}

/// Mounts a match detail whose participants alternate between two teams
async fn mount_match(server: &MockServer, match_id: &str, players: &[&str]) {
    let participants: Vec<Value> = players
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let team = if i % 2 == 0 { 100 } else { 200 };
            participant(p, team, team == 100)
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/lol/match/v5/matches/{}", match_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"matchId": match_id},
            "info": {
                "gameDuration": 1800,
                "gameStartTimestamp": 1_700_000_000_000i64,
                "participants": participants,
            }
        })))
        .mount(server)
        .await;
}

/// Mounts a player's match history; `expected_calls` pins how often it is queried
async fn mount_history(
    server: &MockServer,
    puuid: &str,
    match_ids: &[&str],
    expected_calls: Option<u64>,
) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/lol/match/v5/matches/by-puuid/{}/ids", puuid)))
        .respond_with(ResponseTemplate::new(200).set_body_json(match_ids));
    let mock = match expected_calls {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}

async fn mount_account(server: &MockServer, name: &str, tag: &str, puuid: &str) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/riot/account/v1/accounts/by-riot-id/{}/{}",
            name, tag
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "puuid": puuid,
            "gameName": name,
            "tagLine": tag,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_expands_and_dedups() {
    let account = MockServer::start().await;
    let regional = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("rift.db");

    mount_account(&account, "Alpha", "EUW", "alpha").await;
    mount_match(&regional, "EUW1_100", &["alpha", "beta", "gamma"]).await;

    // Each player is processed exactly once even though they meet repeatedly
    mount_history(&regional, "alpha", &["EUW1_100"], Some(1)).await;
    mount_history(&regional, "beta", &["EUW1_100"], Some(1)).await;
    mount_history(&regional, "gamma", &[], Some(1)).await;

    let mut config = create_test_config(
        &account.uri(),
        &regional.uri(),
        db_path.to_str().unwrap(),
        1,
        100,
    );
    // Duplicate seed resolves to the same id
    config.seeds.push(SeedEntry {
        name: "Alpha".to_string(),
        tag: "EUW".to_string(),
    });

    let report = run_crawl(&config, "test-key".to_string(), "hash")
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(report.processed, 3);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.remaining, 0);
    assert_eq!(report.region_counts.get("EUW1"), Some(&2));

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_players().unwrap(), 2);
    assert_eq!(storage.count_matches().unwrap(), 2);
    assert_eq!(storage.count_summaries().unwrap(), 2);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "hash");
    assert_eq!(run.processed, 3);
    assert_eq!(run.inserted, 2);
}

/// Alpha plays EUW1_1 (with b1) and NA1_2 (with c1); alpha's region is EUW1.
/// c1 plays EUW1_4 and NA1_2, so c1's region is also EUW1.
async fn mount_cap_world(account: &MockServer, regional: &MockServer, c1_calls: u64) {
    mount_account(account, "Alpha", "EUW", "alpha").await;
    mount_match(regional, "EUW1_1", &["alpha", "b1"]).await;
    mount_match(regional, "NA1_2", &["alpha", "c1"]).await;
    mount_match(regional, "EUW1_4", &["c1", "e1"]).await;

    mount_history(regional, "alpha", &["EUW1_1", "NA1_2"], Some(1)).await;
    mount_history(regional, "b1", &["EUW1_1", "NA1_2"], Some(0)).await;
    mount_history(regional, "c1", &["EUW1_4", "NA1_2"], Some(c1_calls)).await;
}

fn create_cap_crawler(account: &MockServer, regional: &MockServer) -> Crawler<SqliteStorage> {
    let config = create_test_config(&account.uri(), &regional.uri(), ":memory:", 2, 1);
    let client = ApiClient::new(&config.api, "test-key").unwrap();
    let storage = SqliteStorage::new_in_memory().unwrap();
    Crawler::new(&config, client, storage).unwrap()
}

#[tokio::test]
async fn test_cap_exhaustion_stop_leaves_frontier_undrained() {
    let account = MockServer::start().await;
    let regional = MockServer::start().await;
    mount_cap_world(&account, &regional, 0).await;

    let mut crawler =
        create_cap_crawler(&account, &regional).with_decider(FixedDecision(CapDecision::Stop));
    let seeds = vec![SeedEntry {
        name: "Alpha".to_string(),
        tag: "EUW".to_string(),
    }];
    assert_eq!(crawler.seed(&seeds).await, 1);

    let report = crawler.run().await.unwrap();

    assert_eq!(report.stop_reason, StopReason::OperatorStopped);
    assert_eq!(report.processed, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.region_counts.len(), 1);
    assert_eq!(report.region_counts.get("EUW1"), Some(&1));
    // c1 (NA1 hint) is still queued; b1 was dropped by the EUW1 cap
    assert_eq!(report.remaining, 1);
    assert!(crawler.frontier().has_seen("c1"));
    assert!(!crawler.frontier().has_seen("b1"));

    let run = crawler.storage().get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Stopped);
    assert_eq!(run.stop_reason.as_deref(), Some("operator stopped"));
}

#[tokio::test]
async fn test_cap_exhaustion_continue_resets_counts() {
    let account = MockServer::start().await;
    let regional = MockServer::start().await;
    mount_cap_world(&account, &regional, 1).await;

    let mut crawler = create_cap_crawler(&account, &regional)
        .with_decider(FixedDecision(CapDecision::Continue));
    let seeds = vec![SeedEntry {
        name: "Alpha".to_string(),
        tag: "EUW".to_string(),
    }];
    crawler.seed(&seeds).await;

    let report = crawler.run().await.unwrap();

    // c1 lands in EUW1 again, which only works because the counts were reset
    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(report.processed, 2);
    assert_eq!(report.inserted, 2);
    assert!(report.region_counts.is_empty());
    assert_eq!(crawler.storage().count_summaries().unwrap(), 2);
}

#[tokio::test]
async fn test_unresolvable_seed_is_skipped() {
    let account = MockServer::start().await;
    let regional = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/riot/account/v1/accounts/by-riot-id/Ghost/NA1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&account)
        .await;
    mount_account(&account, "Alpha", "EUW", "alpha").await;
    mount_history(&regional, "alpha", &[], Some(1)).await;

    let mut crawler = create_cap_crawler(&account, &regional);
    let seeds = vec![
        SeedEntry {
            name: "Ghost".to_string(),
            tag: "NA1".to_string(),
        },
        SeedEntry {
            name: "Alpha".to_string(),
            tag: "EUW".to_string(),
        },
    ];
    assert_eq!(crawler.seed(&seeds).await, 1);

    let report = crawler.run().await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.inserted, 0);
    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_processed_ceiling_stops_run() {
    let account = MockServer::start().await;
    let regional = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("rift.db");

    mount_account(&account, "Alpha", "EUW", "alpha").await;
    mount_match(&regional, "KR_9", &["alpha", "beta", "gamma", "delta"]).await;
    mount_history(&regional, "alpha", &["KR_9"], Some(1)).await;
    mount_history(&regional, "beta", &["KR_9"], Some(0)).await;

    let mut config = create_test_config(
        &account.uri(),
        &regional.uri(),
        db_path.to_str().unwrap(),
        1,
        100,
    );
    config.crawler.max_processed_players = 1;

    let report = run_crawl(&config, "test-key".to_string(), "hash")
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::ProcessedCeiling);
    assert_eq!(report.processed, 1);
    assert_eq!(report.remaining, 3);
}
