use hsg_application::IntakeReceipt;
use hsg_domain::{BusinessStage, ServiceType};
use serde::Serialize;
use ts_rs::TS;

/// One selectable option of the public intake form.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/intake-option-response.ts"
)]
pub struct IntakeOptionResponse {
    pub value: &'static str,
    pub label: &'static str,
}

/// Option catalogs for the public intake form.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/intake-options-response.ts"
)]
pub struct IntakeOptionsResponse {
    pub ok: bool,
    pub business_stages: Vec<IntakeOptionResponse>,
    pub services: Vec<IntakeOptionResponse>,
}

impl IntakeOptionsResponse {
    pub fn catalog() -> Self {
        Self {
            ok: true,
            business_stages: BusinessStage::all()
                .iter()
                .map(|stage| IntakeOptionResponse {
                    value: stage.as_str(),
                    label: stage.label(),
                })
                .collect(),
            services: ServiceType::all()
                .iter()
                .map(|service| IntakeOptionResponse {
                    value: service.as_str(),
                    label: service.label(),
                })
                .collect(),
        }
    }
}

/// Result of a public intake submission.
///
/// `case_number` and `case_id` are null when the intake was stored but no
/// case could be opened; `intake_id` is only present in that case.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/submit-intake-response.ts"
)]
pub struct SubmitIntakeResponse {
    pub ok: bool,
    pub case_number: Option<String>,
    pub case_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub intake_id: Option<String>,
}

impl From<IntakeReceipt> for SubmitIntakeResponse {
    fn from(value: IntakeReceipt) -> Self {
        match value.case {
            Some(case) => Self {
                ok: true,
                case_number: Some(case.case_number.to_string()),
                case_id: Some(case.id.to_string()),
                intake_id: None,
            },
            None => Self {
                ok: true,
                case_number: None,
                case_id: None,
                intake_id: Some(value.intake_id.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use hsg_application::{IntakeReceipt, OpenedCase};
    use hsg_domain::{CaseId, CaseNumber, IntakeId};
    use serde_json::json;

    use super::{IntakeOptionsResponse, SubmitIntakeResponse};

    #[test]
    fn receipt_with_case_omits_intake_id() {
        let case_id = CaseId::new();
        let receipt = IntakeReceipt {
            intake_id: IntakeId::new(),
            case: CaseNumber::parse("HSG-2026-4821")
                .ok()
                .map(|case_number| OpenedCase {
                    id: case_id,
                    case_number,
                }),
        };

        let body = serde_json::to_value(SubmitIntakeResponse::from(receipt))
            .unwrap_or_default();
        assert_eq!(
            body,
            json!({ "ok": true, "caseNumber": "HSG-2026-4821", "caseId": case_id.to_string() })
        );
    }

    #[test]
    fn receipt_without_case_reports_intake_id() {
        let intake_id = IntakeId::new();
        let body = serde_json::to_value(SubmitIntakeResponse::from(IntakeReceipt {
            intake_id,
            case: None,
        }))
        .unwrap_or_default();

        assert_eq!(
            body,
            json!({
                "ok": true,
                "caseNumber": null,
                "caseId": null,
                "intakeId": intake_id.to_string()
            })
        );
    }

    #[test]
    fn catalog_lists_every_option() {
        let catalog = IntakeOptionsResponse::catalog();

        assert_eq!(catalog.business_stages.len(), 5);
        assert_eq!(catalog.services.len(), 6);
        assert_eq!(catalog.services[4].value, "credit-enablement");
    }
}
