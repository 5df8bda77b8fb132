//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::analysis::{PlayerMatchStats, PlayerSummary};
use crate::api::PlayerIdentity;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, SummaryRecord};
use crate::RiftError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database file and applies the schema
    pub fn new(path: &Path) -> Result<Self, RiftError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, RiftError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, processed, inserted, stop_reason";

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Failed),
        processed: row.get::<_, i64>(5)? as u64,
        inserted: row.get::<_, i64>(6)? as u64,
        stop_reason: row.get(7)?,
    })
}

fn write_player(conn: &Connection, identity: &PlayerIdentity) -> StorageResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO players (puuid, display_name, tag, first_seen_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(puuid) DO UPDATE SET
             display_name = excluded.display_name,
             tag = excluded.tag,
             updated_at = excluded.updated_at",
        params![identity.opaque_id, identity.display_name, identity.tag, now],
    )?;
    Ok(())
}

fn write_matches(conn: &Connection, batch: &[PlayerMatchStats]) -> StorageResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO matches (
             match_id, player_puuid, champion, role, lane,
             kills, deaths, assists, kda,
             kill_participation, kill_share, damage_share,
             damage, damage_per_minute, gold, gold_per_minute,
             cs, cs_per_minute, vision_score, vision_per_minute,
             wards_placed, wards_killed,
             damage_to_objectives, damage_taken, damage_taken_per_minute,
             turret_kills, dragon_kills, baron_kills, herald_kills,
             double_kills, triple_kills, quadra_kills, penta_kills,
             game_duration, win, impact_score, match_timestamp
         ) VALUES (
             ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
             ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
             ?31, ?32, ?33, ?34, ?35, ?36, ?37
         )
         ON CONFLICT(match_id, player_puuid) DO UPDATE SET
             champion = excluded.champion,
             role = excluded.role,
             lane = excluded.lane,
             kills = excluded.kills,
             deaths = excluded.deaths,
             assists = excluded.assists,
             kda = excluded.kda,
             kill_participation = excluded.kill_participation,
             kill_share = excluded.kill_share,
             damage_share = excluded.damage_share,
             damage = excluded.damage,
             damage_per_minute = excluded.damage_per_minute,
             gold = excluded.gold,
             gold_per_minute = excluded.gold_per_minute,
             cs = excluded.cs,
             cs_per_minute = excluded.cs_per_minute,
             vision_score = excluded.vision_score,
             vision_per_minute = excluded.vision_per_minute,
             wards_placed = excluded.wards_placed,
             wards_killed = excluded.wards_killed,
             damage_to_objectives = excluded.damage_to_objectives,
             damage_taken = excluded.damage_taken,
             damage_taken_per_minute = excluded.damage_taken_per_minute,
             turret_kills = excluded.turret_kills,
             dragon_kills = excluded.dragon_kills,
             baron_kills = excluded.baron_kills,
             herald_kills = excluded.herald_kills,
             double_kills = excluded.double_kills,
             triple_kills = excluded.triple_kills,
             quadra_kills = excluded.quadra_kills,
             penta_kills = excluded.penta_kills,
             game_duration = excluded.game_duration,
             win = excluded.win,
             impact_score = excluded.impact_score,
             match_timestamp = excluded.match_timestamp",
    )?;

    for g in batch {
        stmt.execute(params![
            g.match_id,
            g.player_id,
            g.champion,
            g.role,
            g.lane,
            g.kills,
            g.deaths,
            g.assists,
            g.kda,
            g.kill_participation,
            g.kill_share,
            g.damage_share,
            g.damage,
            g.damage_per_minute,
            g.gold,
            g.gold_per_minute,
            g.cs,
            g.cs_per_minute,
            g.vision_score,
            g.vision_per_minute,
            g.wards_placed,
            g.wards_killed,
            g.damage_to_objectives,
            g.damage_taken,
            g.damage_taken_per_minute,
            g.turret_kills,
            g.dragon_kills,
            g.baron_kills,
            g.herald_kills,
            g.double_kills,
            g.triple_kills,
            g.quadra_kills,
            g.penta_kills,
            g.game_duration,
            g.win,
            g.impact_score,
            g.match_timestamp,
        ])?;
    }

    Ok(())
}

fn write_summary(conn: &Connection, puuid: &str, s: &PlayerSummary) -> StorageResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO player_summaries (
             puuid, avg_kills, avg_deaths, avg_assists, avg_kda, win_rate,
             avg_dpm, avg_gpm, avg_cs_per_minute, avg_impact_score,
             avg_damage, avg_vision_score, avg_cs, avg_gold,
             region, matches_count, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
         ON CONFLICT(puuid) DO UPDATE SET
             avg_kills = excluded.avg_kills,
             avg_deaths = excluded.avg_deaths,
             avg_assists = excluded.avg_assists,
             avg_kda = excluded.avg_kda,
             win_rate = excluded.win_rate,
             avg_dpm = excluded.avg_dpm,
             avg_gpm = excluded.avg_gpm,
             avg_cs_per_minute = excluded.avg_cs_per_minute,
             avg_impact_score = excluded.avg_impact_score,
             avg_damage = excluded.avg_damage,
             avg_vision_score = excluded.avg_vision_score,
             avg_cs = excluded.avg_cs,
             avg_gold = excluded.avg_gold,
             region = excluded.region,
             matches_count = excluded.matches_count,
             updated_at = excluded.updated_at",
        params![
            puuid,
            s.avg_kills,
            s.avg_deaths,
            s.avg_assists,
            s.avg_kda,
            s.win_rate,
            s.avg_dpm,
            s.avg_gpm,
            s.avg_cs_per_minute,
            s.avg_impact_score,
            s.avg_damage,
            s.avg_vision_score,
            s.avg_cs,
            s.avg_gold,
            s.region,
            s.matches_count as i64,
            now,
        ],
    )?;
    Ok(())
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        processed: u64,
        inserted: u64,
        stop_reason: Option<&str>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, processed = ?3, inserted = ?4,
             stop_reason = ?5 WHERE id = ?6",
            params![
                status.to_db_string(),
                now,
                processed as i64,
                inserted as i64,
                stop_reason,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        let run = self.conn.query_row(&sql, [], run_from_row).optional()?;
        Ok(run)
    }

    // ===== Profile Persistence =====

    fn upsert_player(&mut self, identity: &PlayerIdentity) -> StorageResult<()> {
        write_player(&self.conn, identity)
    }

    fn upsert_matches(&mut self, batch: &[PlayerMatchStats]) -> StorageResult<()> {
        write_matches(&self.conn, batch)
    }

    fn upsert_summary(&mut self, puuid: &str, summary: &PlayerSummary) -> StorageResult<()> {
        write_summary(&self.conn, puuid, summary)
    }

    fn persist_profile(
        &mut self,
        identity: &PlayerIdentity,
        batch: &[PlayerMatchStats],
        summary: &PlayerSummary,
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        write_player(&tx, identity)?;
        write_matches(&tx, batch)?;
        write_summary(&tx, &identity.opaque_id, summary)?;
        tx.commit()?;
        Ok(())
    }

    // ===== Statistics =====

    fn count_players(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_matches(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_summaries(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM player_summaries", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn summaries_by_region(&self) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT region, COUNT(*) FROM player_summaries
             WHERE region IS NOT NULL GROUP BY region ORDER BY region",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn get_leaderboard(&self, limit: Option<usize>) -> StorageResult<Vec<SummaryRecord>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map_or(-1, |l| l as i64);

        let mut stmt = self.conn.prepare(
            "SELECT s.puuid, p.display_name, p.tag, s.region, s.matches_count,
                    s.avg_kills, s.avg_deaths, s.avg_assists, s.avg_kda, s.win_rate,
                    s.avg_dpm, s.avg_gpm, s.avg_cs_per_minute, s.avg_impact_score,
                    s.avg_damage, s.avg_vision_score, s.avg_cs, s.avg_gold, s.updated_at
             FROM player_summaries s
             JOIN players p ON p.puuid = s.puuid
             ORDER BY s.avg_kda DESC, s.puuid ASC
             LIMIT ?1",
        )?;

        let records = stmt
            .query_map(params![limit], |row| {
                Ok(SummaryRecord {
                    puuid: row.get(0)?,
                    display_name: row.get(1)?,
                    tag: row.get(2)?,
                    region: row.get(3)?,
                    matches_count: row.get(4)?,
                    avg_kills: row.get(5)?,
                    avg_deaths: row.get(6)?,
                    avg_assists: row.get(7)?,
                    avg_kda: row.get(8)?,
                    win_rate: row.get(9)?,
                    avg_dpm: row.get(10)?,
                    avg_gpm: row.get(11)?,
                    avg_cs_per_minute: row.get(12)?,
                    avg_impact_score: row.get(13)?,
                    avg_damage: row.get(14)?,
                    avg_vision_score: row.get(15)?,
                    avg_cs: row.get(16)?,
                    avg_gold: row.get(17)?,
                    updated_at: row.get(18)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
