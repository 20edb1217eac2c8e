use hsg_domain::{CaseWithIntake, IntakeRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string of the admin case list.
#[derive(Debug, Deserialize)]
pub struct CaseStatusQuery {
    pub status: Option<String>,
}

/// Intake details shown alongside a case.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/intake-summary-response.ts"
)]
pub struct IntakeSummaryResponse {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_stage: String,
    pub service_needed: String,
    pub message: Option<String>,
}

impl From<IntakeRecord> for IntakeSummaryResponse {
    fn from(value: IntakeRecord) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            business_stage: value.business_stage,
            service_needed: value.service_needed,
            message: value.message,
        }
    }
}

/// Filing case as returned to the admin console.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/case-response.ts"
)]
pub struct CaseResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub intake_id: String,
    pub case_number: String,
    pub status: String,
    pub assigned_to: Option<String>,
    /// `YYYY-MM-DD`.
    pub due_date: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "intake_submissions")]
    pub intake: Option<IntakeSummaryResponse>,
}

impl From<CaseWithIntake> for CaseResponse {
    fn from(value: CaseWithIntake) -> Self {
        let case = value.case;
        Self {
            id: case.id.to_string(),
            created_at: case.created_at.to_rfc3339(),
            updated_at: case.updated_at.to_rfc3339(),
            intake_id: case.intake_id.to_string(),
            case_number: case.case_number.to_string(),
            status: case.status.as_str().to_owned(),
            assigned_to: case.assigned_to,
            due_date: case.due_date.map(|date| date.to_string()),
            notes: case.notes,
            intake: value.intake.map(IntakeSummaryResponse::from),
        }
    }
}

/// Envelope for a case list.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/case-list-response.ts"
)]
pub struct CaseListResponse {
    pub ok: bool,
    pub cases: Vec<CaseResponse>,
}

/// Envelope for a single case.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/single-case-response.ts"
)]
pub struct SingleCaseResponse {
    pub ok: bool,
    pub case: CaseResponse,
}
