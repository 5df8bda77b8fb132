//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Rift-Ripple database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    processed INTEGER NOT NULL DEFAULT 0,
    inserted INTEGER NOT NULL DEFAULT 0,
    stop_reason TEXT
);

-- Resolved player identities
CREATE TABLE IF NOT EXISTS players (
    puuid TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    tag TEXT NOT NULL,
    first_seen_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Per-match metrics, one row per (match, player)
CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id TEXT NOT NULL,
    player_puuid TEXT NOT NULL REFERENCES players(puuid),
    champion TEXT NOT NULL,
    role TEXT,
    lane TEXT,
    kills INTEGER NOT NULL,
    deaths INTEGER NOT NULL,
    assists INTEGER NOT NULL,
    kda REAL NOT NULL,
    kill_participation REAL NOT NULL,
    kill_share REAL NOT NULL,
    damage_share REAL NOT NULL,
    damage INTEGER NOT NULL,
    damage_per_minute REAL NOT NULL,
    gold INTEGER NOT NULL,
    gold_per_minute REAL NOT NULL,
    cs INTEGER NOT NULL,
    cs_per_minute REAL NOT NULL,
    vision_score INTEGER NOT NULL,
    vision_per_minute REAL NOT NULL,
    wards_placed INTEGER NOT NULL,
    wards_killed INTEGER NOT NULL,
    damage_to_objectives INTEGER NOT NULL,
    damage_taken INTEGER NOT NULL,
    damage_taken_per_minute REAL NOT NULL,
    turret_kills INTEGER NOT NULL,
    dragon_kills INTEGER NOT NULL,
    baron_kills INTEGER NOT NULL,
    herald_kills INTEGER NOT NULL,
    double_kills INTEGER NOT NULL,
    triple_kills INTEGER NOT NULL,
    quadra_kills INTEGER NOT NULL,
    penta_kills INTEGER NOT NULL,
    game_duration INTEGER NOT NULL,
    win INTEGER NOT NULL,
    impact_score REAL NOT NULL,
    match_timestamp INTEGER,
    UNIQUE(match_id, player_puuid)
);

CREATE INDEX IF NOT EXISTS idx_matches_player ON matches(player_puuid);

-- Averages over a complete batch, one row per player
CREATE TABLE IF NOT EXISTS player_summaries (
    puuid TEXT PRIMARY KEY REFERENCES players(puuid),
    avg_kills REAL NOT NULL,
    avg_deaths REAL NOT NULL,
    avg_assists REAL NOT NULL,
    avg_kda REAL NOT NULL,
    win_rate REAL NOT NULL,
    avg_dpm REAL NOT NULL,
    avg_gpm REAL NOT NULL,
    avg_cs_per_minute REAL NOT NULL,
    avg_impact_score REAL NOT NULL,
    avg_damage REAL NOT NULL,
    avg_vision_score REAL NOT NULL,
    avg_cs REAL NOT NULL,
    avg_gold REAL NOT NULL,
    region TEXT,
    matches_count INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_summaries_region ON player_summaries(region);
CREATE INDEX IF NOT EXISTS idx_summaries_kda ON player_summaries(avg_kda);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
