//! PostgreSQL-backed intake, case and document repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use hsg_application::{
    CaseDocumentRepository, CaseNumberLookup, CaseRepository, IntakeRepository, NewFilingCase,
};
use hsg_core::{AppError, AppResult};
use hsg_domain::{
    CaseDocument, CaseId, CaseNumber, CasePatch, CaseStatus, CaseStatusFilter, CaseWithIntake,
    DocumentId, FilingCase, IntakeId, IntakeRecord, IntakeSubmission,
};

mod cases;
mod documents;
mod intakes;

/// PostgreSQL implementation of the intake, case and document ports.
#[derive(Clone)]
pub struct PostgresCaseRepository {
    pool: PgPool,
}

impl PostgresCaseRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IntakeRow {
    id: uuid::Uuid,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    phone: String,
    business_stage: String,
    service_needed: String,
    message: Option<String>,
}

impl From<IntakeRow> for IntakeRecord {
    fn from(row: IntakeRow) -> Self {
        Self {
            id: IntakeId::from_uuid(row.id),
            created_at: row.created_at,
            name: row.name,
            email: row.email,
            phone: row.phone,
            business_stage: row.business_stage,
            service_needed: row.service_needed,
            message: row.message,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CaseRow {
    id: uuid::Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    intake_id: uuid::Uuid,
    case_number: String,
    status: String,
    assigned_to: Option<String>,
    due_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl TryFrom<CaseRow> for FilingCase {
    type Error = AppError;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CaseId::from_uuid(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            intake_id: IntakeId::from_uuid(row.intake_id),
            case_number: CaseNumber::parse(row.case_number.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "persisted case number '{}' is invalid: {error}",
                    row.case_number
                ))
            })?,
            status: CaseStatus::from_transport(row.status.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "persisted case status '{}' is invalid: {error}",
                    row.status
                ))
            })?,
            assigned_to: row.assigned_to,
            due_date: row.due_date,
            notes: row.notes,
        })
    }
}

/// Case row with the columns of its intake, which may be missing.
#[derive(Debug, sqlx::FromRow)]
struct CaseWithIntakeRow {
    #[sqlx(flatten)]
    case: CaseRow,
    intake_created_at: Option<DateTime<Utc>>,
    intake_name: Option<String>,
    intake_email: Option<String>,
    intake_phone: Option<String>,
    intake_business_stage: Option<String>,
    intake_service_needed: Option<String>,
    intake_message: Option<String>,
}

impl TryFrom<CaseWithIntakeRow> for CaseWithIntake {
    type Error = AppError;

    fn try_from(row: CaseWithIntakeRow) -> Result<Self, Self::Error> {
        let intake_id = IntakeId::from_uuid(row.case.intake_id);
        let intake = match (
            row.intake_created_at,
            row.intake_name,
            row.intake_email,
            row.intake_phone,
            row.intake_business_stage,
            row.intake_service_needed,
        ) {
            (
                Some(created_at),
                Some(name),
                Some(email),
                Some(phone),
                Some(business_stage),
                Some(service_needed),
            ) => Some(IntakeRecord {
                id: intake_id,
                created_at,
                name,
                email,
                phone,
                business_stage,
                service_needed,
                message: row.intake_message,
            }),
            _ => None,
        };

        Ok(Self {
            case: FilingCase::try_from(row.case)?,
            intake,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: uuid::Uuid,
    case_id: uuid::Uuid,
    filename: String,
    mime: String,
    size: i64,
    storage_path: String,
    uploaded_at: DateTime<Utc>,
}

impl From<DocumentRow> for CaseDocument {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: DocumentId::from_uuid(row.id),
            case_id: CaseId::from_uuid(row.case_id),
            filename: row.filename,
            mime: row.mime,
            size: row.size,
            storage_path: row.storage_path,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[async_trait]
impl IntakeRepository for PostgresCaseRepository {
    async fn create_intake(
        &self,
        submission: &IntakeSubmission,
        created_at: DateTime<Utc>,
    ) -> AppResult<IntakeRecord> {
        self.create_intake_impl(submission, created_at).await
    }
}

#[async_trait]
impl CaseRepository for PostgresCaseRepository {
    async fn create_case(&self, case: NewFilingCase) -> AppResult<FilingCase> {
        self.create_case_impl(case).await
    }

    async fn find_case(&self, case_id: CaseId) -> AppResult<Option<CaseWithIntake>> {
        self.find_case_impl(case_id).await
    }

    async fn list_cases(&self, filter: CaseStatusFilter) -> AppResult<Vec<CaseWithIntake>> {
        self.list_cases_impl(filter).await
    }

    async fn update_case(
        &self,
        case_id: CaseId,
        patch: &CasePatch,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<CaseWithIntake>> {
        self.update_case_impl(case_id, patch, updated_at).await
    }
}

#[async_trait]
impl CaseNumberLookup for PostgresCaseRepository {
    async fn case_number_exists(&self, case_number: &CaseNumber) -> AppResult<bool> {
        self.case_number_exists_impl(case_number).await
    }
}

#[async_trait]
impl CaseDocumentRepository for PostgresCaseRepository {
    async fn create_document(&self, document: CaseDocument) -> AppResult<CaseDocument> {
        self.create_document_impl(document).await
    }

    async fn list_documents(&self, case_id: CaseId) -> AppResult<Vec<CaseDocument>> {
        self.list_documents_impl(case_id).await
    }

    async fn find_document(
        &self,
        case_id: CaseId,
        document_id: DocumentId,
    ) -> AppResult<Option<CaseDocument>> {
        self.find_document_impl(case_id, document_id).await
    }

    async fn delete_document(&self, document_id: DocumentId) -> AppResult<bool> {
        self.delete_document_impl(document_id).await
    }
}

fn conflict_or_internal(error: sqlx::Error, operation: &str, conflict: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict.to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
