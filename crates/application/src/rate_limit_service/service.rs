use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use hsg_core::AppResult;

use super::config::RateLimitRule;
use super::ports::RateLimitStore;
use crate::Clock;

/// Message returned to clients whose request was denied.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a moment and try again.";

/// Admit or deny outcome for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Configured limit for the window.
    pub limit: u32,
    /// Requests still admitted in the current window; zero when denied.
    pub remaining: u32,
    /// When the current window ends.
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Whole seconds until the window ends, rounded up and at least one.
    #[must_use]
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds().max(0);
        let seconds = u64::try_from(millis).unwrap_or_default().div_ceil(1000);
        seconds.max(1)
    }
}

/// Application service for rate limiting.
#[derive(Clone)]
pub struct RateLimitService {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimitService {
    /// Creates a new rate limit service.
    #[must_use]
    pub fn new(store: Arc<dyn RateLimitStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the current time as seen by the service clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Records a request for `identifier` and decides whether it is admitted.
    pub async fn check(
        &self,
        rule: &RateLimitRule,
        identifier: &str,
    ) -> AppResult<RateLimitDecision> {
        let key = rule.key_for(identifier);
        let info = self
            .store
            .record_attempt(&key, rule.window(), self.clock.now())
            .await?;

        if info.attempt_count > rule.limit() {
            debug!(
                category = rule.category(),
                attempts = info.attempt_count,
                "rate limit exceeded"
            );
            return Ok(RateLimitDecision {
                allowed: false,
                limit: rule.limit(),
                remaining: 0,
                reset_at: info.reset_at,
            });
        }

        Ok(RateLimitDecision {
            allowed: true,
            limit: rule.limit(),
            remaining: rule.limit() - info.attempt_count,
            reset_at: info.reset_at,
        })
    }

    /// Removes expired window entries.
    pub async fn cleanup(&self) -> AppResult<u64> {
        self.store.sweep_expired(self.clock.now()).await
    }
}
