//! Process-local fixed-window rate limit store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use hsg_application::{AttemptInfo, RateLimitStore};
use hsg_core::AppResult;
use tokio::sync::Mutex;
use tracing::debug;

/// Minimum spacing between opportunistic sweeps of expired entries.
pub const GC_INTERVAL_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    reset_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, RateLimitEntry>,
    last_sweep: Option<DateTime<Utc>>,
}

impl StoreState {
    fn sweep(&mut self, now: DateTime<Utc>) -> u64 {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.reset_at);
        self.last_sweep = Some(now);
        u64::try_from(before - self.entries.len()).unwrap_or_default()
    }

    fn sweep_if_due(&mut self, now: DateTime<Utc>) {
        let Some(last_sweep) = self.last_sweep else {
            self.last_sweep = Some(now);
            return;
        };

        if now - last_sweep < TimeDelta::seconds(GC_INTERVAL_SECONDS) {
            return;
        }

        let removed = self.sweep(now);
        if removed > 0 {
            debug!(removed, "swept expired rate limit entries");
        }
    }
}

/// In-memory rate limit store.
///
/// State lives in this process only; counters are lost on restart and are
/// not shared between instances. All access goes through one mutex, so
/// attempts on the same key are linearized.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    state: Mutex<StoreState>,
}

impl InMemoryRateLimitStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn record_attempt(
        &self,
        key: &str,
        window: TimeDelta,
        now: DateTime<Utc>,
    ) -> AppResult<AttemptInfo> {
        let mut state = self.state.lock().await;
        state.sweep_if_due(now);

        let entry = match state.entries.get_mut(key) {
            Some(entry) if now <= entry.reset_at => {
                entry.count = entry.count.saturating_add(1);
                *entry
            }
            _ => {
                let entry = RateLimitEntry {
                    count: 1,
                    reset_at: now + window,
                };
                state.entries.insert(key.to_owned(), entry);
                entry
            }
        };

        Ok(AttemptInfo {
            attempt_count: entry.count,
            reset_at: entry.reset_at,
        })
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        Ok(self.state.lock().await.sweep(now))
    }
}
