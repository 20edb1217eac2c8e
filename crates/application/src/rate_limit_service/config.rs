use chrono::TimeDelta;
use hsg_core::{AppError, AppResult};

/// Requests admitted per window when no limit is configured.
pub const DEFAULT_RATE_LIMIT: u32 = 5;

/// Window length in milliseconds when none is configured.
pub const DEFAULT_RATE_WINDOW_MS: u64 = 60_000;

/// Configuration for a rate limit rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRule {
    category: String,
    limit: u32,
    window: TimeDelta,
}

impl RateLimitRule {
    /// Creates a rule admitting `limit` requests per `window_ms` milliseconds.
    ///
    /// Both values must be greater than zero.
    pub fn new(category: impl Into<String>, limit: u32, window_ms: u64) -> AppResult<Self> {
        if limit == 0 {
            return Err(AppError::Validation(
                "rate limit must be greater than zero".to_owned(),
            ));
        }

        if window_ms == 0 {
            return Err(AppError::Validation(
                "rate limit window must be greater than zero".to_owned(),
            ));
        }

        let window = i64::try_from(window_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .ok_or_else(|| {
                AppError::Validation(format!("rate limit window {window_ms}ms is out of range"))
            })?;

        Ok(Self {
            category: category.into(),
            limit,
            window,
        })
    }

    /// Creates a rule with the default limit and window.
    pub fn with_defaults(category: impl Into<String>) -> AppResult<Self> {
        Self::new(category, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW_MS)
    }

    /// The route or category name the rule applies to (e.g. `"intake"`).
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Maximum number of admitted requests per window.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Window length.
    #[must_use]
    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Builds the store key for an identifier under this rule.
    #[must_use]
    pub fn key_for(&self, identifier: &str) -> String {
        format!("{}:{identifier}", self.category)
    }
}
