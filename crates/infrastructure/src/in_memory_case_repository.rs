use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hsg_application::{
    CaseDocumentRepository, CaseNumberLookup, CaseRepository, IntakeRepository, NewFilingCase,
};
use hsg_core::{AppError, AppResult};
use hsg_domain::{
    CaseDocument, CaseId, CaseNumber, CasePatch, CaseStatusFilter, CaseWithIntake, DocumentId,
    FilingCase, IntakeId, IntakeRecord, IntakeSubmission,
};
use tokio::sync::RwLock;

/// In-memory intake, case and document repository for local development.
#[derive(Debug, Default)]
pub struct InMemoryCaseRepository {
    intakes: RwLock<HashMap<IntakeId, IntakeRecord>>,
    cases: RwLock<HashMap<CaseId, FilingCase>>,
    documents: RwLock<HashMap<DocumentId, CaseDocument>>,
}

impl InMemoryCaseRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_intake(&self, case: FilingCase) -> CaseWithIntake {
        let intake = self.intakes.read().await.get(&case.intake_id).cloned();
        CaseWithIntake { case, intake }
    }
}

#[async_trait]
impl IntakeRepository for InMemoryCaseRepository {
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

        self.intakes.write().await.insert(record.id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl CaseRepository for InMemoryCaseRepository {
    async fn create_case(&self, case: NewFilingCase) -> AppResult<FilingCase> {
        let mut cases = self.cases.write().await;

        if cases
            .values()
            .any(|existing| existing.case_number == case.case_number)
        {
            return Err(AppError::Conflict(format!(
                "case number '{}' already exists",
                case.case_number
            )));
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
        cases.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find_case(&self, case_id: CaseId) -> AppResult<Option<CaseWithIntake>> {
        let case = self.cases.read().await.get(&case_id).cloned();
        match case {
            Some(case) => Ok(Some(self.with_intake(case).await)),
            None => Ok(None),
        }
    }

    async fn list_cases(&self, filter: CaseStatusFilter) -> AppResult<Vec<CaseWithIntake>> {
        let mut cases: Vec<FilingCase> = self
            .cases
            .read()
            .await
            .values()
            .filter(|case| filter.matches(case.status))
            .cloned()
            .collect();
        cases.sort_by_key(|case| Reverse(case.created_at));

        let mut joined = Vec::with_capacity(cases.len());
        for case in cases {
            joined.push(self.with_intake(case).await);
        }

        Ok(joined)
    }

    async fn update_case(
        &self,
        case_id: CaseId,
        patch: &CasePatch,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<CaseWithIntake>> {
        let updated = {
            let mut cases = self.cases.write().await;
            cases.get_mut(&case_id).map(|case| {
                patch.apply_to(case);
                case.updated_at = updated_at;
                case.clone()
            })
        };

        match updated {
            Some(case) => Ok(Some(self.with_intake(case).await)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CaseNumberLookup for InMemoryCaseRepository {
    async fn case_number_exists(&self, case_number: &CaseNumber) -> AppResult<bool> {
        Ok(self
            .cases
            .read()
            .await
            .values()
            .any(|case| &case.case_number == case_number))
    }
}

#[async_trait]
impl CaseDocumentRepository for InMemoryCaseRepository {
    async fn create_document(&self, document: CaseDocument) -> AppResult<CaseDocument> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&document.id) {
            return Err(AppError::Conflict(format!(
                "document '{}' already exists",
                document.id
            )));
        }

        documents.insert(document.id, document.clone());
        Ok(document)
    }

    async fn list_documents(&self, case_id: CaseId) -> AppResult<Vec<CaseDocument>> {
        let mut documents: Vec<CaseDocument> = self
            .documents
            .read()
            .await
            .values()
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
            .read()
            .await
            .get(&document_id)
            .filter(|document| document.case_id == case_id)
            .cloned())
    }

    async fn delete_document(&self, document_id: DocumentId) -> AppResult<bool> {
        Ok(self.documents.write().await.remove(&document_id).is_some())
    }
}
