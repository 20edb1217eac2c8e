//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod case;
mod document;
mod ids;
mod intake;

pub use case::{
    CASE_NUMBER_PREFIX, CASE_SEQUENCE_MAX, CASE_SEQUENCE_MIN, CaseNumber, CasePatch, CaseStatus,
    CaseStatusFilter, CaseWithIntake, FilingCase,
};
pub use document::{
    CaseDocument, DocumentMime, MAX_UPLOAD_SIZE, document_storage_path, sanitize_filename,
};
pub use ids::{CaseId, DocumentId, IntakeId};
pub use intake::{
    BusinessStage, EmailAddress, INTAKE_VALIDATION_MESSAGE, IntakeDraft, IntakeRecord,
    IntakeSubmission, MESSAGE_MAX_LENGTH, NAME_MAX_LENGTH, PHONE_MAX_LENGTH, ServiceType,
};
