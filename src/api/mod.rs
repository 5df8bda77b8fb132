//! Upstream telemetry API access
//!
//! This module contains everything that talks to the Riot API:
//! - The rate-limited, retry-aware client
//! - Riot ID → puuid resolution
//! - Match history search across regional endpoints
//! - Structured payload records

mod account;
mod client;
mod limiter;
mod matches;
pub mod models;

pub use account::{account_url, AccountResolver, PlayerIdentity};
pub use client::{build_http_client, endpoint_url, retry_backoff, ApiClient};
pub use limiter::RateLimiter;
pub use matches::{fetch_match_detail, match_ids_url, MatchIndex, MatchIndexFetcher};
pub use models::{region_shard, short_id};
