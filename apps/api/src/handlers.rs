pub mod cases;
pub mod documents;
pub mod health;
pub mod intake;

use hsg_core::AppError;
use hsg_domain::{CaseId, DocumentId};

/// Parses a case id path segment; malformed ids are reported as missing cases.
fn parse_case_id(value: &str) -> Result<CaseId, AppError> {
    CaseId::parse(value).map_err(|_| AppError::NotFound("Case not found.".to_owned()))
}

fn parse_document_id(value: &str) -> Result<DocumentId, AppError> {
    DocumentId::parse(value).map_err(|_| AppError::NotFound("Document not found.".to_owned()))
}
