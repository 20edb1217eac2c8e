//! Admin console operations on filing cases.

use std::sync::Arc;

use hsg_core::{AppError, AppResult};
use hsg_domain::{CaseId, CasePatch, CaseStatusFilter, CaseWithIntake};

use crate::{CaseRepository, Clock};


/// Application service for case administration.
#[derive(Clone)]
pub struct CaseService {
    cases: Arc<dyn CaseRepository>,
    clock: Arc<dyn Clock>,
}

impl CaseService {
    /// Creates a new case service.
    #[must_use]
    pub fn new(cases: Arc<dyn CaseRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { cases, clock }
    }

    /// Lists cases newest first, optionally filtered by status.
    pub async fn list_cases(&self, filter: CaseStatusFilter) -> AppResult<Vec<CaseWithIntake>> {
        self.cases.list_cases(filter).await
    }

    /// Returns one case with its intake.
    pub async fn get_case(&self, case_id: CaseId) -> AppResult<CaseWithIntake> {
        self.cases
            .find_case(case_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Case not found.".to_owned()))
    }

    /// Applies whitelisted field updates to a case.
    pub async fn update_case(
        &self,
        case_id: CaseId,
        patch: CasePatch,
    ) -> AppResult<CaseWithIntake> {
        if patch.is_empty() {
            return Err(AppError::Validation(
                "No valid fields to update.".to_owned(),
            ));
        }

        self.cases
            .update_case(case_id, &patch, self.clock.now())
            .await?
            .ok_or_else(|| AppError::NotFound("Case not found.".to_owned()))
    }
}
