//! Hand-written port fakes shared by service tests.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use hsg_core::{AppError, AppResult};
use hsg_domain::{
    CaseDocument, CaseId, CaseNumber, CasePatch, CaseStatusFilter, CaseWithIntake, DocumentId,
    FilingCase, IntakeId, IntakeRecord, IntakeSubmission,
};

use crate::{
    CaseDocumentRepository, CaseNumberLookup, CaseRepository, DocumentStorage, IntakeNotification,
    IntakeNotifier, IntakeRepository, NewFilingCase, RandomSource,
};

fn poisoned(error: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("test state poisoned: {error}"))
}

#[derive(Default)]
pub(crate) struct FakeCaseStore {
    pub intakes: Mutex<Vec<IntakeRecord>>,
    pub cases: Mutex<Vec<FilingCase>>,
    pub documents: Mutex<Vec<CaseDocument>>,
    /// Case numbers whose insert reports a unique-constraint conflict.
    pub conflicting_numbers: Mutex<Vec<String>>,
    pub fail_case_insert: bool,
    pub fail_document_delete: bool,
}

impl FakeCaseStore {
    pub fn case_count(&self) -> usize {
        self.cases
            .lock()
            .map(|cases| cases.len())
            .unwrap_or_default()
    }

    fn join(&self, case: FilingCase) -> AppResult<CaseWithIntake> {
        let intake = self
            .intakes
            .lock()
            .map_err(poisoned)?
            .iter()
            .find(|intake| intake.id == case.intake_id)
            .cloned();

        Ok(CaseWithIntake { case, intake })
    }
}

#[async_trait]
impl IntakeRepository for FakeCaseStore {
    async fn create_intake(
        &self,
        submission: &IntakeSubmission,
        created_at: DateTime<Utc>,
    ) -> AppResult<IntakeRecord> {
        let record = IntakeRecord {
            id: IntakeId::new(),
            created_at,
            name: submission.name().to_owned(),
            email: submission.email().as_str().to_owned(),
            phone: submission.phone().to_owned(),
            business_stage: submission.business_stage().to_owned(),
            service_needed: submission.service_needed().to_owned(),
            message: submission.message().map(str::to_owned),
        };
        self.intakes.lock().map_err(poisoned)?.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl CaseRepository for FakeCaseStore {
    async fn create_case(&self, case: NewFilingCase) -> AppResult<FilingCase> {
        if self.fail_case_insert {
            return Err(AppError::Internal("insert failed".to_owned()));
        }

        let mut conflicting = self.conflicting_numbers.lock().map_err(poisoned)?;
        if let Some(position) = conflicting
            .iter()
            .position(|number| number == case.case_number.as_str())
        {
            conflicting.remove(position);
            return Err(AppError::Conflict("duplicate case number".to_owned()));
        }

        let stored = FilingCase {
            id: CaseId::new(),
            created_at: case.created_at,
            updated_at: case.created_at,
            intake_id: case.intake_id,
            case_number: case.case_number,
            status: case.status,
            assigned_to: None,
            due_date: None,
            notes: None,
        };
        self.cases.lock().map_err(poisoned)?.push(stored.clone());
        Ok(stored)
    }

    async fn find_case(&self, case_id: CaseId) -> AppResult<Option<CaseWithIntake>> {
        let case = self
            .cases
            .lock()
            .map_err(poisoned)?
            .iter()
            .find(|case| case.id == case_id)
            .cloned();

        case.map(|case| self.join(case)).transpose()
    }

    async fn list_cases(&self, filter: CaseStatusFilter) -> AppResult<Vec<CaseWithIntake>> {
        let mut cases: Vec<FilingCase> = self
            .cases
            .lock()
            .map_err(poisoned)?
            .iter()
            .filter(|case| filter.matches(case.status))
            .cloned()
            .collect();
        cases.sort_by_key(|case| Reverse(case.created_at));

        cases.into_iter().map(|case| self.join(case)).collect()
    }

    async fn update_case(
        &self,
        case_id: CaseId,
        patch: &CasePatch,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<CaseWithIntake>> {
        let updated = {
            let mut cases = self.cases.lock().map_err(poisoned)?;
            let case = cases.iter_mut().find(|case| case.id == case_id);
            case.map(|case| {
                patch.apply_to(case);
                case.updated_at = updated_at;
                case.clone()
            })
        };

        updated.map(|case| self.join(case)).transpose()
    }
}

#[async_trait]
impl CaseNumberLookup for FakeCaseStore {
    async fn case_number_exists(&self, case_number: &CaseNumber) -> AppResult<bool> {
        Ok(self
            .cases
            .lock()
            .map_err(poisoned)?
            .iter()
            .any(|case| &case.case_number == case_number))
    }
}

#[async_trait]
impl CaseDocumentRepository for FakeCaseStore {
    async fn create_document(&self, document: CaseDocument) -> AppResult<CaseDocument> {
        self.documents
            .lock()
            .map_err(poisoned)?
            .push(document.clone());
        Ok(document)
    }

    async fn list_documents(&self, case_id: CaseId) -> AppResult<Vec<CaseDocument>> {
        let mut documents: Vec<CaseDocument> = self
            .documents
            .lock()
            .map_err(poisoned)?
            .iter()
            .filter(|document| document.case_id == case_id)
            .cloned()
            .collect();
        documents.sort_by_key(|document| Reverse(document.uploaded_at));
        Ok(documents)
    }

    async fn find_document(
        &self,
        case_id: CaseId,
        document_id: DocumentId,
    ) -> AppResult<Option<CaseDocument>> {
        Ok(self
            .documents
            .lock()
            .map_err(poisoned)?
            .iter()
            .find(|document| document.id == document_id && document.case_id == case_id)
            .cloned())
    }

    async fn delete_document(&self, document_id: DocumentId) -> AppResult<bool> {
        if self.fail_document_delete {
            return Err(AppError::Internal("delete failed".to_owned()));
        }

        let mut documents = self.documents.lock().map_err(poisoned)?;
        let before = documents.len();
        documents.retain(|document| document.id != document_id);
        Ok(documents.len() != before)
    }
}

#[derive(Default)]
pub(crate) struct FakeStorage {
    pub objects: Mutex<BTreeMap<String, Vec<u8>>>,
    pub fail_put: bool,
    pub fail_remove: bool,
    pub fail_sign: bool,
}

impl FakeStorage {
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStorage for FakeStorage {
    async fn put_object(&self, key: &str, bytes: &[u8], _content_type: &str) -> AppResult<()> {
        if self.fail_put {
            return Err(AppError::Internal("bucket unavailable".to_owned()));
        }

        let mut objects = self.objects.lock().map_err(poisoned)?;
        if objects.contains_key(key) {
            return Err(AppError::Conflict(format!("object '{key}' already exists")));
        }
        objects.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn remove_object(&self, key: &str) -> AppResult<()> {
        if self.fail_remove {
            return Err(AppError::Internal("bucket unavailable".to_owned()));
        }

        self.objects.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_at: DateTime<Utc>) -> AppResult<String> {
        if self.fail_sign {
            return Err(AppError::Internal("signing key missing".to_owned()));
        }

        Ok(format!(
            "https://files.test/{key}?expires={}",
            expires_at.timestamp()
        ))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub notifications: Mutex<Vec<IntakeNotification>>,
    pub fail: bool,
}

#[async_trait]
impl IntakeNotifier for RecordingNotifier {
    async fn intake_received(&self, notification: &IntakeNotification) -> AppResult<()> {
        self.notifications
            .lock()
            .map_err(poisoned)?
            .push(notification.clone());

        if self.fail {
            return Err(AppError::Internal("crm offline".to_owned()));
        }

        Ok(())
    }
}

/// Random source that always yields the same word.
pub(crate) struct ConstantRandom(pub u32);

impl RandomSource for ConstantRandom {
    fn next_u32(&self) -> AppResult<u32> {
        Ok(self.0)
    }
}
