mod cases;
mod common;
mod documents;
mod intake;

pub use cases::{CaseListResponse, CaseResponse, CaseStatusQuery, SingleCaseResponse};
pub use common::{HealthDependencyStatus, HealthResponse, OkResponse};
pub use documents::{
    DeleteDocumentQuery, DocumentListResponse, DocumentResponse, DownloadQuery,
    UploadDocumentResponse,
};
pub use intake::{IntakeOptionsResponse, SubmitIntakeResponse};

#[cfg(test)]
mod tests {
    use super::cases::IntakeSummaryResponse;
    use super::intake::IntakeOptionResponse;
    use super::{
        CaseListResponse, CaseResponse, DocumentListResponse, DocumentResponse, HealthResponse,
        IntakeOptionsResponse, OkResponse, SingleCaseResponse, SubmitIntakeResponse,
        UploadDocumentResponse,
    };

    use crate::error::{ErrorBody, ErrorResponse};
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        IntakeOptionResponse::export(&config)?;
        IntakeOptionsResponse::export(&config)?;
        SubmitIntakeResponse::export(&config)?;
        IntakeSummaryResponse::export(&config)?;
        CaseResponse::export(&config)?;
        CaseListResponse::export(&config)?;
        SingleCaseResponse::export(&config)?;
        DocumentResponse::export(&config)?;
        DocumentListResponse::export(&config)?;
        UploadDocumentResponse::export(&config)?;
        OkResponse::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorBody::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
