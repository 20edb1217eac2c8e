//! Public intake submission flow.

use std::sync::Arc;

use tracing::{error, info, warn};

use hsg_core::{AppError, AppResult};
use hsg_domain::{CaseId, CaseNumber, CaseStatus, IntakeDraft, IntakeId, IntakeSubmission};

use crate::{
    CaseNumberService, CaseRepository, Clock, IntakeNotification, IntakeNotifier,
    IntakeRepository, NewFilingCase,
};


/// Case inserts attempted when a freshly issued number loses a race.
const CASE_INSERT_ATTEMPTS: usize = 3;

/// Outcome of an accepted intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReceipt {
    /// Stored intake.
    pub intake_id: IntakeId,
    /// Opened case, absent when case creation failed after the intake was saved.
    pub case: Option<OpenedCase>,
}

/// Case opened for an intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedCase {
    /// Case identifier.
    pub id: CaseId,
    /// Issued case number.
    pub case_number: CaseNumber,
}

/// Application service for intake submissions.
#[derive(Clone)]
pub struct IntakeService {
    intakes: Arc<dyn IntakeRepository>,
    cases: Arc<dyn CaseRepository>,
    case_numbers: CaseNumberService,
    notifier: Arc<dyn IntakeNotifier>,
    clock: Arc<dyn Clock>,
    log_case_numbers: bool,
}

impl IntakeService {
    /// Creates a new intake service.
    #[must_use]
    pub fn new(
        intakes: Arc<dyn IntakeRepository>,
        cases: Arc<dyn CaseRepository>,
        case_numbers: CaseNumberService,
        notifier: Arc<dyn IntakeNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            intakes,
            cases,
            case_numbers,
            notifier,
            clock,
            log_case_numbers: true,
        }
    }

    /// Controls whether created case numbers are written to the log.
    #[must_use]
    pub fn with_case_number_logging(mut self, enabled: bool) -> Self {
        self.log_case_numbers = enabled;
        self
    }

    /// Validates and stores an intake, then opens a case for it.
    ///
    /// Failing to open the case does not fail the submission: the intake is
    /// already stored, so the receipt is returned without a case.
    pub async fn submit(&self, draft: IntakeDraft) -> AppResult<IntakeReceipt> {
        let submission = IntakeSubmission::validate(draft)?;

        let intake = self
            .intakes
            .create_intake(&submission, self.clock.now())
            .await?;

        let case = match self.open_case(intake.id).await {
            Ok(case) => {
                if self.log_case_numbers {
                    info!(case_number = %case.case_number, "created filing case");
                }
                Some(case)
            }
            Err(case_error) => {
                error!(intake_id = %intake.id, error = %case_error, "failed to open filing case");
                None
            }
        };

        let notification = IntakeNotification {
            intake_id: intake.id,
            service_needed: submission.service_needed().to_owned(),
            case_number: case.as_ref().map(|case| case.case_number.clone()),
        };
        if let Err(notify_error) = self.notifier.intake_received(&notification).await {
            warn!(intake_id = %intake.id, error = %notify_error, "intake notification failed");
        }

        Ok(IntakeReceipt {
            intake_id: intake.id,
            case,
        })
    }

    async fn open_case(&self, intake_id: IntakeId) -> AppResult<OpenedCase> {
        let mut last_conflict = None;

        for _ in 0..CASE_INSERT_ATTEMPTS {
            let case_number = self.case_numbers.generate().await?;
            let created = self
                .cases
                .create_case(NewFilingCase {
                    intake_id,
                    case_number,
                    status: CaseStatus::New,
                    created_at: self.clock.now(),
                })
                .await;

            match created {
                Ok(case) => {
                    return Ok(OpenedCase {
                        id: case.id,
                        case_number: case.case_number,
                    });
                }
                Err(AppError::Conflict(message)) => {
                    warn!("case number taken between check and insert, retrying");
                    last_conflict = Some(message);
                }
                Err(other) => return Err(other),
            }
        }

        Err(AppError::Conflict(last_conflict.unwrap_or_else(|| {
            "could not reserve a unique case number".to_owned()
        })))
    }
}
