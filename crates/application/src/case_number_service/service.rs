use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Datelike;
use tracing::{debug, warn};

use hsg_core::{AppError, AppResult};
use hsg_domain::{CASE_SEQUENCE_MAX, CASE_SEQUENCE_MIN, CaseNumber};

use super::ports::{CaseNumberLookup, RandomSource};
use super::random::sequence_in_range;
use crate::Clock;

/// Random candidates tried before falling back to a timestamp suffix.
pub const CASE_NUMBER_MAX_ATTEMPTS: usize = 10;

/// Upper bound on a single existence lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Application service issuing case numbers.
#[derive(Clone)]
pub struct CaseNumberService {
    lookup: Arc<dyn CaseNumberLookup>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    lookup_timeout: Duration,
    last_fallback_millis: Arc<AtomicI64>,
}

impl CaseNumberService {
    /// Creates a service with the default lookup timeout.
    #[must_use]
    pub fn new(
        lookup: Arc<dyn CaseNumberLookup>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lookup,
            random,
            clock,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            last_fallback_millis: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }

    /// Overrides the per-lookup timeout.
    #[must_use]
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Issues a case number not currently present in persistence.
    ///
    /// A failed or timed-out lookup aborts generation with an error.
    pub async fn generate(&self) -> AppResult<CaseNumber> {
        let year = self.clock.now().year();

        for attempt in 1..=CASE_NUMBER_MAX_ATTEMPTS {
            let sequence =
                sequence_in_range(self.random.as_ref(), CASE_SEQUENCE_MIN, CASE_SEQUENCE_MAX)?;
            let candidate = CaseNumber::from_sequence(year, sequence)?;

            if !self.exists(&candidate).await? {
                return Ok(candidate);
            }

            debug!(attempt, "case number candidate already taken");
        }

        let millis = self.next_fallback_millis(self.clock.now().timestamp_millis());
        let millis = u64::try_from(millis).map_err(|_| {
            AppError::Internal("system clock is before the unix epoch".to_owned())
        })?;
        let case_number = CaseNumber::new(year, encode_base36(millis).to_uppercase().as_str())?;

        warn!(
            attempts = CASE_NUMBER_MAX_ATTEMPTS,
            "random case numbers exhausted, using timestamp suffix"
        );

        Ok(case_number)
    }

    async fn exists(&self, candidate: &CaseNumber) -> AppResult<bool> {
        tokio::time::timeout(
            self.lookup_timeout,
            self.lookup.case_number_exists(candidate),
        )
        .await
        .map_err(|_| {
            AppError::Internal(format!(
                "case number lookup timed out after {}ms",
                self.lookup_timeout.as_millis()
            ))
        })?
    }

    /// Returns `now_millis`, or one past the last fallback value if that is
    /// not already in the past, so two fallbacks never share a suffix.
    fn next_fallback_millis(&self, now_millis: i64) -> i64 {
        let previous = self
            .last_fallback_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_millis.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);

        now_millis.max(previous.saturating_add(1))
    }
}

/// Encodes a number in lowercase base 36 (`0-9a-z`).
#[must_use]
pub fn encode_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_owned();
    }

    let mut encoded = Vec::new();
    while value > 0 {
        let digit = usize::try_from(value % 36).unwrap_or_default();
        encoded.push(char::from(DIGITS[digit]));
        value /= 36;
    }

    encoded.iter().rev().collect()
}
