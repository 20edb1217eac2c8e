//! Persistence, storage and notification ports for intakes and cases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use hsg_core::AppResult;
use hsg_domain::{
    CaseDocument, CaseId, CaseNumber, CasePatch, CaseStatus, CaseStatusFilter, CaseWithIntake,
    DocumentId, FilingCase, IntakeId, IntakeRecord, IntakeSubmission,
};

/// Repository port for intake submissions.
#[async_trait]
pub trait IntakeRepository: Send + Sync {
    /// Persists a validated submission.
    async fn create_intake(
        &self,
        submission: &IntakeSubmission,
        created_at: DateTime<Utc>,
    ) -> AppResult<IntakeRecord>;
}

/// Values for a new filing case row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFilingCase {
    /// Intake the case is created from.
    pub intake_id: IntakeId,
    /// Issued case number.
    pub case_number: CaseNumber,
    /// Initial status.
    pub status: CaseStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Repository port for filing cases.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Inserts a case.
    ///
    /// Returns `AppError::Conflict` when the case number is already taken.
    async fn create_case(&self, case: NewFilingCase) -> AppResult<FilingCase>;

    /// Finds a case with its intake.
    async fn find_case(&self, case_id: CaseId) -> AppResult<Option<CaseWithIntake>>;

    /// Lists cases newest first.
    async fn list_cases(&self, filter: CaseStatusFilter) -> AppResult<Vec<CaseWithIntake>>;

    /// Applies a patch and returns the updated case, or `None` if missing.
    async fn update_case(
        &self,
        case_id: CaseId,
        patch: &CasePatch,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<CaseWithIntake>>;
}

/// Repository port for case document metadata.
#[async_trait]
pub trait CaseDocumentRepository: Send + Sync {
    /// Inserts document metadata.
    async fn create_document(&self, document: CaseDocument) -> AppResult<CaseDocument>;

    /// Lists a case's documents, newest first.
    async fn list_documents(&self, case_id: CaseId) -> AppResult<Vec<CaseDocument>>;

    /// Finds a document belonging to the given case.
    async fn find_document(
        &self,
        case_id: CaseId,
        document_id: DocumentId,
    ) -> AppResult<Option<CaseDocument>>;

    /// Deletes document metadata. Returns whether a row was removed.
    async fn delete_document(&self, document_id: DocumentId) -> AppResult<bool>;
}

/// Object storage port for document bytes.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Stores an object. Fails with `AppError::Conflict` if the key exists.
    async fn put_object(&self, key: &str, bytes: &[u8], content_type: &str) -> AppResult<()>;

    /// Removes an object.
    async fn remove_object(&self, key: &str) -> AppResult<()>;

    /// Returns a time-limited download URL for an object.
    async fn signed_url(&self, key: &str, expires_at: DateTime<Utc>) -> AppResult<String>;
}

/// Notification sent after an intake is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeNotification {
    /// Stored intake.
    pub intake_id: IntakeId,
    /// Service the client asked about.
    pub service_needed: String,
    /// Case number, when a case was opened.
    pub case_number: Option<CaseNumber>,
}

/// Port for downstream integrations (CRM, email) that react to new intakes.
#[async_trait]
pub trait IntakeNotifier: Send + Sync {
    /// Delivers a notification about an accepted intake.
    async fn intake_received(&self, notification: &IntakeNotification) -> AppResult<()>;
}
