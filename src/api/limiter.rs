//! Request spacing for the upstream API
//!
//! The upstream budget is expressed as N requests per window. Rather than track
//! a sliding window, the limiter enforces the equivalent fixed spacing between
//! consecutive attempts.

use std::time::{Duration, Instant};

/// Enforces a minimum delay between consecutive request attempts
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum time between two attempts
    min_spacing: Duration,

    /// When the last attempt finished, successful or not
    last_attempt: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter that allows one attempt per `min_spacing`
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_attempt: None,
        }
    }

    /// Returns the configured spacing
    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    /// Calculates the time until the next attempt may start
    ///
    /// Returns None if an attempt can be made now.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let last = self.last_attempt?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.min_spacing {
            Some(self.min_spacing - elapsed)
        } else {
            None
        }
    }

    /// Waits until the minimum spacing since the last attempt has elapsed
    pub async fn acquire(&mut self) {
        if let Some(wait) = self.time_until_ready(Instant::now()) {
            tracing::debug!("Sleeping {:.2}s before calling the API", wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }

    /// Records that an attempt just completed
    ///
    /// Called after every attempt, including failed ones and the 429 retry.
    pub fn record_attempt(&mut self) {
        self.last_attempt = Some(Instant::now());
    }
}
