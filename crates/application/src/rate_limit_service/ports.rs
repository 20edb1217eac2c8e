use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use hsg_core::AppResult;

/// Store port for per-key window counters.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Records an attempt for the given key at `now`.
    ///
    /// Opens a fresh window ending at `now + window` when the key is unknown
    /// or its window has passed; otherwise increments the counter and keeps
    /// the current window end. Returns the counter after this attempt.
    async fn record_attempt(
        &self,
        key: &str,
        window: TimeDelta,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptInfo>;

    /// Removes every entry whose window ended before `now`.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Counter state for a key after recording an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptInfo {
    /// Attempts in the current window, including this one.
    pub attempt_count: u32,
    /// When the current window ends.
    pub reset_at: DateTime<Utc>,
}
