//! Match history lookup across regional endpoints
//!
//! A player's matches live behind exactly one regional routing value, and the
//! crawler does not know which one up front. The search order is fixed and the
//! first endpoint with enough history wins, so repeated runs pick the same
//! endpoint for the same player.

use crate::api::client::{endpoint_url, ApiClient};
use crate::api::models::{short_id, MatchDto};
use crate::ApiResult;
use url::Url;

/// Recent match ids for a player and the endpoint that served them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchIndex {
    /// Match ids, most recent first
    pub match_ids: Vec<String>,

    /// Regional endpoint that returned the ids; match details come from here too
    pub endpoint: Url,
}

/// Searches the regional endpoints for a player's recent match ids
pub struct MatchIndexFetcher<'a> {
    client: &'a ApiClient,
    endpoints: &'a [Url],
}

impl<'a> MatchIndexFetcher<'a> {
    pub fn new(client: &'a ApiClient, endpoints: &'a [Url]) -> Self {
        Self { client, endpoints }
    }

    /// Finds up to `want_count` recent match ids
    ///
    /// # Selection
    ///
    /// 1. Endpoints are queried in configured order.
    /// 2. The first endpoint returning at least `want_count` ids is chosen and
    ///    no further endpoints are queried.
    /// 3. Otherwise the first endpoint with the largest non-empty list is used.
    /// 4. If every endpoint failed or was empty, returns None.
    pub async fn fetch(&self, puuid: &str, want_count: usize) -> Option<MatchIndex> {
        let mut best: Option<MatchIndex> = None;

        for base in self.endpoints {
            tracing::debug!("Trying {} for match ids (puuid={}...)", base, short_id(puuid));

            let url = match_ids_url(base, puuid, want_count);
            let match_ids: Vec<String> = match self.client.request_as(url.as_str()).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::debug!("Match id lookup failed on {}: {}", base, e);
                    continue;
                }
            };

            if match_ids.is_empty() {
                continue;
            }

            tracing::debug!("Got {} matches on {}", match_ids.len(), base);

            if match_ids.len() >= want_count {
                return Some(MatchIndex {
                    match_ids,
                    endpoint: base.clone(),
                });
            }

            let larger = best
                .as_ref()
                .map_or(true, |b| match_ids.len() > b.match_ids.len());
            if larger {
                best = Some(MatchIndex {
                    match_ids,
                    endpoint: base.clone(),
                });
            }
        }

        match &best {
            Some(partial) => tracing::info!(
                "Using partial history ({} matches) from {}",
                partial.match_ids.len(),
                partial.endpoint
            ),
            None => tracing::info!(
                "No matches found on any region for puuid={}...",
                short_id(puuid)
            ),
        }

        best
    }
}

/// Fetches the full detail payload of one match
pub async fn fetch_match_detail(
    client: &ApiClient,
    endpoint: &Url,
    match_id: &str,
) -> ApiResult<MatchDto> {
    let url = endpoint_url(endpoint, ["lol", "match", "v5", "matches", match_id]);
    client.request_as(url.as_str()).await
}

/// Builds the match id lookup URL for one regional endpoint
pub fn match_ids_url(base: &Url, puuid: &str, count: usize) -> Url {
    let mut url = endpoint_url(
        base,
        ["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
    );
    url.query_pairs_mut()
        .append_pair("count", &count.to_string());
    url
}
