use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hsg_core::AppError;
use hsg_domain::{CaseId, CaseNumber, CaseStatus, DocumentId, IntakeId, MAX_UPLOAD_SIZE};

use super::{DocumentService, UploadDocumentInput};
use crate::test_support::{FakeCaseStore, FakeStorage};
use crate::{CaseRepository, ManualClock, NewFilingCase};

fn now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_792_310_400_000)
        .single()
        .unwrap_or_default()
}

async fn seed_case(store: &FakeCaseStore) -> CaseId {
    store
        .create_case(NewFilingCase {
            intake_id: IntakeId::new(),
            case_number: CaseNumber::from_sequence(2026, 3141)
                .unwrap_or_else(|error| panic!("{error}")),
            status: CaseStatus::InProgress,
            created_at: now(),
        })
        .await
        .map(|case| case.id)
        .unwrap_or_else(|error| panic!("{error}"))
}

fn service(store: Arc<FakeCaseStore>, storage: Arc<FakeStorage>) -> DocumentService {
    DocumentService::new(
        store.clone(),
        store,
        storage,
        Arc::new(ManualClock::new(now())),
    )
}

fn pdf(name: &str) -> UploadDocumentInput {
    UploadDocumentInput {
        filename: name.to_owned(),
        content_type: "application/pdf".to_owned(),
        bytes: b"%PDF-1.7".to_vec(),
    }
}

#[tokio::test]
async fn upload_stores_object_under_case_number() {
    let store = Arc::new(FakeCaseStore::default());
    let storage = Arc::new(FakeStorage::default());
    let case_id = seed_case(&store).await;

    let document = service(store, storage.clone())
        .upload(case_id, pdf("EIN letter.pdf"))
        .await
        .unwrap_or_else(|error| panic!("{error}"));

    assert_eq!(
        document.storage_path,
        "HSG-2026-3141/1792310400000-EIN_letter.pdf"
    );
    assert_eq!(document.filename, "EIN letter.pdf");
    assert_eq!(document.size, 8);
    assert_eq!(storage.keys(), vec![document.storage_path]);
}

#[tokio::test]
async fn upload_to_unknown_case_is_not_found() {
    let store = Arc::new(FakeCaseStore::default());
    let result = service(store, Arc::new(FakeStorage::default()))
        .upload(CaseId::new(), pdf("a.pdf"))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn disallowed_content_type_is_rejected() {
    let store = Arc::new(FakeCaseStore::default());
    let storage = Arc::new(FakeStorage::default());
    let case_id = seed_case(&store).await;

    let mut input = pdf("notes.txt");
    input.content_type = "text/plain".to_owned();
    let result = service(store, storage.clone()).upload(case_id, input).await;

    assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("text/plain")));
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let store = Arc::new(FakeCaseStore::default());
    let case_id = seed_case(&store).await;

    let mut input = pdf("scan.pdf");
    input.bytes = vec![0; usize::try_from(MAX_UPLOAD_SIZE).unwrap_or_default() + 1];
    let result = service(store, Arc::new(FakeStorage::default()))
        .upload(case_id, input)
        .await;

    assert!(matches!(result, Err(AppError::Validation(message)) if message.starts_with("File too large (10.0 MB)")));
}

#[tokio::test]
async fn storage_failure_skips_metadata() {
    let store = Arc::new(FakeCaseStore::default());
    let storage = Arc::new(FakeStorage {
        fail_put: true,
        ..FakeStorage::default()
    });
    let case_id = seed_case(&store).await;

    let result = service(store.clone(), storage)
        .upload(case_id, pdf("a.pdf"))
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    let documents = store
        .documents
        .lock()
        .map(|values| values.len())
        .unwrap_or(usize::MAX);
    assert_eq!(documents, 0);
}

#[tokio::test]
async fn list_signs_each_document_and_tolerates_signing_failures() {
    let store = Arc::new(FakeCaseStore::default());
    let case_id = seed_case(&store).await;
    service(store.clone(), Arc::new(FakeStorage::default()))
        .upload(case_id, pdf("a.pdf"))
        .await
        .unwrap_or_else(|error| panic!("{error}"));

    let signed = service(store.clone(), Arc::new(FakeStorage::default()))
        .list(case_id)
        .await
        .unwrap_or_default();
    assert_eq!(signed.len(), 1);
    assert_eq!(
        signed[0].download_url.as_deref(),
        Some("https://files.test/HSG-2026-3141/1792310400000-a.pdf?expires=1792314000")
    );

    let unsigned = service(
        store,
        Arc::new(FakeStorage {
            fail_sign: true,
            ..FakeStorage::default()
        }),
    )
    .list(case_id)
    .await
    .unwrap_or_default();
    assert_eq!(unsigned.len(), 1);
    assert_eq!(unsigned[0].download_url, None);
}

#[tokio::test]
async fn delete_removes_metadata_even_when_storage_fails() {
    let store = Arc::new(FakeCaseStore::default());
    let case_id = seed_case(&store).await;
    let document = service(store.clone(), Arc::new(FakeStorage::default()))
        .upload(case_id, pdf("a.pdf"))
        .await
        .unwrap_or_else(|error| panic!("{error}"));

    let storage = Arc::new(FakeStorage {
        fail_remove: true,
        ..FakeStorage::default()
    });
    let result = service(store.clone(), storage)
        .delete(case_id, document.id)
        .await;

    assert!(result.is_ok());
    let documents = store
        .documents
        .lock()
        .map(|values| values.len())
        .unwrap_or(usize::MAX);
    assert_eq!(documents, 0);
}

#[tokio::test]
async fn delete_requires_document_to_belong_to_case() {
    let store = Arc::new(FakeCaseStore::default());
    let case_id = seed_case(&store).await;
    let document = service(store.clone(), Arc::new(FakeStorage::default()))
        .upload(case_id, pdf("a.pdf"))
        .await
        .unwrap_or_else(|error| panic!("{error}"));

    let other_case = service(store.clone(), Arc::new(FakeStorage::default()))
        .delete(CaseId::new(), document.id)
        .await;
    assert!(matches!(other_case, Err(AppError::NotFound(_))));

    let unknown = service(store, Arc::new(FakeStorage::default()))
        .delete(case_id, DocumentId::new())
        .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn metadata_delete_failure_is_reported() {
    let store = Arc::new(FakeCaseStore::default());
    let case_id = seed_case(&store).await;
    let document = service(store.clone(), Arc::new(FakeStorage::default()))
        .upload(case_id, pdf("a.pdf"))
        .await
        .unwrap_or_else(|error| panic!("{error}"));

    let failing = Arc::new(FakeCaseStore {
        fail_document_delete: true,
        ..FakeCaseStore::default()
    });
    if let (Ok(mut target), Ok(source)) = (failing.documents.lock(), store.documents.lock()) {
        target.extend(source.iter().cloned());
    }

    let result = service(failing, Arc::new(FakeStorage::default()))
        .delete(case_id, document.id)
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));
}
