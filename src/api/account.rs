//! Riot ID resolution
//!
//! Maps a display name and tag to the stable player id (puuid).

use crate::api::client::{endpoint_url, ApiClient};
use crate::api::models::AccountDto;
use crate::{ApiError, ApiResult};
use url::Url;

/// A resolved player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub display_name: String,
    pub tag: String,
    pub opaque_id: String,
}

/// Resolves Riot IDs through the account endpoint
pub struct AccountResolver<'a> {
    client: &'a ApiClient,
    account_base: &'a Url,
}

impl<'a> AccountResolver<'a> {
    pub fn new(client: &'a ApiClient, account_base: &'a Url) -> Self {
        Self {
            client,
            account_base,
        }
    }

    /// Resolves `display_name#tag` to a player identity
    ///
    /// A response without a puuid is `NotFound`, not a transport error. The
    /// canonical name and tag from the response replace the supplied ones.
    pub async fn resolve(&self, display_name: &str, tag: &str) -> ApiResult<PlayerIdentity> {
        tracing::info!("Resolving account {}#{}", display_name, tag);

        let url = account_url(self.account_base, display_name, tag);
        let account: AccountDto = self.client.request_as(url.as_str()).await?;

        let opaque_id = account
            .puuid
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::NotFound(format!("{}#{}", display_name, tag)))?;

        Ok(PlayerIdentity {
            display_name: account
                .game_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| display_name.to_string()),
            tag: account
                .tag_line
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| tag.to_string()),
            opaque_id,
        })
    }
}

/// Builds the account lookup URL, percent-encoding both components
pub fn account_url(base: &Url, display_name: &str, tag: &str) -> Url {
    endpoint_url(
        base,
        [
            "riot",
            "account",
            "v1",
            "accounts",
            "by-riot-id",
            display_name,
            tag,
        ],
    )
}
