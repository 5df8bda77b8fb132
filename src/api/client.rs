//! Rate-limited HTTP client for the telemetry API
//!
//! This module handles every outbound request, including:
//! - Building the HTTP client with a fixed timeout
//! - Spacing requests through the shared rate limiter
//! - A single retry after an HTTP 429, honoring Retry-After
//! - Error classification

use crate::api::limiter::RateLimiter;
use crate::config::ApiConfig;
use crate::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Header carrying the API key
const TOKEN_HEADER: &str = "X-Riot-Token";

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The API configuration (timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the upstream API
///
/// Every call from every component goes through [`ApiClient::request`], which
/// holds the limiter for the whole attempt, so at most one request is ever in
/// flight.
pub struct ApiClient {
    http: Client,
    api_key: String,
    limiter: Mutex<RateLimiter>,
    default_retry_after: Duration,
}

impl ApiClient {
    /// Creates a client from the API configuration and a resolved key
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client(config)?,
            api_key: api_key.into(),
            limiter: Mutex::new(RateLimiter::new(config.min_spacing())),
            default_retry_after: Duration::from_secs(config.default_retry_after_secs),
        })
    }

    /// Fetches a URL and parses the body as JSON
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 429 | Sleep Retry-After + 1s, retry once |
    /// | HTTP 429 on retry | RateLimited |
    /// | Other non-2xx | Http, no retry |
    /// | Timeout / connection error | Transport, no retry |
    /// | Unparseable body | MalformedResponse |
    pub async fn request(&self, url: &str) -> ApiResult<Value> {
        let mut limiter = self.limiter.lock().await;
        limiter.acquire().await;

        let mut response = self.send(url).await;
        limiter.record_attempt();

        if let Ok(first) = &response {
            if first.status() == StatusCode::TOO_MANY_REQUESTS {
                let backoff = retry_backoff(first.headers(), self.default_retry_after);
                tracing::warn!(
                    "429 rate limited, sleeping {}s then retrying once ({})",
                    backoff.as_secs(),
                    url
                );
                tokio::time::sleep(backoff).await;

                response = self.send(url).await;
                limiter.record_attempt();
            }
        }

        let response = response?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Still rate limited after retry: {}", url);
            return Err(ApiError::RateLimited {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Non-success status {} for {}", status.as_u16(), url);
            tracing::debug!("Response body: {}", truncate(&body, 200));
            return Err(ApiError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!("Failed to parse JSON from {}: {}", url, e);
            ApiError::MalformedResponse {
                url: url.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Fetches a URL and deserializes the JSON body into `T`
    pub async fn request_as<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let value = self.request(url).await?;
        serde_json::from_value(value).map_err(|e| ApiError::MalformedResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn send(&self, url: &str) -> ApiResult<Response> {
        self.http
            .get(url)
            .header(TOKEN_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                tracing::warn!("Request error: {} ({})", message, url);
                ApiError::Transport {
                    url: url.to_string(),
                    message,
                }
            })
    }
}

/// Computes the sleep before retrying a 429: the Retry-After hint in seconds,
/// or `fallback` when absent or not an integer, plus one second
pub fn retry_backoff(headers: &HeaderMap, fallback: Duration) -> Duration {
    let hint = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(fallback);

    hint + Duration::from_secs(1)
}

/// Appends path segments to an API base, percent-encoding each one
pub fn endpoint_url<I>(base: &Url, segments: I) -> Url
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
