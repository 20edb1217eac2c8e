use async_trait::async_trait;

use hsg_core::AppResult;
use hsg_domain::CaseNumber;

/// Point lookup against persisted cases by case number.
#[async_trait]
pub trait CaseNumberLookup: Send + Sync {
    /// Returns whether a case with exactly this case number exists.
    ///
    /// Backend failures must be returned as errors, never as `false`.
    async fn case_number_exists(&self, case_number: &CaseNumber) -> AppResult<bool>;
}

/// Source of uniformly distributed random words.
pub trait RandomSource: Send + Sync {
    /// Returns the next random `u32`.
    fn next_u32(&self) -> AppResult<u32>;
}
