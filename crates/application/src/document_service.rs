//! Case document upload, listing and removal.

use std::sync::Arc;

use chrono::TimeDelta;
use tracing::{error, warn};

use hsg_core::{AppError, AppResult};
use hsg_domain::{
    CaseDocument, CaseId, DocumentId, DocumentMime, MAX_UPLOAD_SIZE, document_storage_path,
};

use crate::{CaseDocumentRepository, CaseRepository, Clock, DocumentStorage};

#[cfg(test)]
mod tests;

/// Lifetime of a signed download link, in seconds.
pub const SIGNED_URL_TTL_SECONDS: i64 = 60 * 60;

/// A file received from the admin console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDocumentInput {
    /// Client-side filename.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Document metadata with a time-limited download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentWithUrl {
    /// Stored metadata.
    pub document: CaseDocument,
    /// Signed link, absent when signing failed.
    pub download_url: Option<String>,
}

/// Application service for case documents.
#[derive(Clone)]
pub struct DocumentService {
    cases: Arc<dyn CaseRepository>,
    documents: Arc<dyn CaseDocumentRepository>,
    storage: Arc<dyn DocumentStorage>,
    clock: Arc<dyn Clock>,
}

impl DocumentService {
    /// Creates a new document service.
    #[must_use]
    pub fn new(
        cases: Arc<dyn CaseRepository>,
        documents: Arc<dyn CaseDocumentRepository>,
        storage: Arc<dyn DocumentStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cases,
            documents,
            storage,
            clock,
        }
    }

    /// Validates and stores a document for a case.
    pub async fn upload(
        &self,
        case_id: CaseId,
        input: UploadDocumentInput,
    ) -> AppResult<CaseDocument> {
        let case = self
            .cases
            .find_case(case_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Case not found.".to_owned()))?;

        let Some(mime) = DocumentMime::from_content_type(input.content_type.as_str()) else {
            return Err(AppError::Validation(format!(
                "Invalid file type \"{}\". Allowed: PDF, JPG, PNG.",
                input.content_type
            )));
        };

        let size = u64::try_from(input.bytes.len()).unwrap_or(u64::MAX);
        if size > MAX_UPLOAD_SIZE {
            return Err(AppError::Validation(format!(
                "File too large ({:.1} MB). Max 10 MB.",
                size as f64 / 1024.0 / 1024.0
            )));
        }

        let uploaded_at = self.clock.now();
        let storage_path =
            document_storage_path(&case.case.case_number, uploaded_at, input.filename.as_str());

        self.storage
            .put_object(storage_path.as_str(), &input.bytes, mime.as_str())
            .await
            .map_err(|storage_error| {
                error!(error = %storage_error, "document storage write failed");
                AppError::Internal("Failed to upload file to storage.".to_owned())
            })?;

        let size = i64::try_from(size)
            .map_err(|error| AppError::Internal(format!("document size overflow: {error}")))?;

        self.documents
            .create_document(CaseDocument {
                id: DocumentId::new(),
                case_id,
                filename: input.filename,
                mime: mime.as_str().to_owned(),
                size,
                storage_path,
                uploaded_at,
            })
            .await
            .map_err(|repository_error| {
                error!(error = %repository_error, "document metadata insert failed");
                AppError::Internal("File uploaded but failed to save metadata.".to_owned())
            })
    }

    /// Lists a case's documents with signed download links.
    pub async fn list(&self, case_id: CaseId) -> AppResult<Vec<DocumentWithUrl>> {
        let documents = self.documents.list_documents(case_id).await?;
        let expires_at = self.clock.now() + TimeDelta::seconds(SIGNED_URL_TTL_SECONDS);

        let mut listed = Vec::with_capacity(documents.len());
        for document in documents {
            let download_url = match self
                .storage
                .signed_url(document.storage_path.as_str(), expires_at)
                .await
            {
                Ok(url) => Some(url),
                Err(sign_error) => {
                    warn!(
                        document_id = %document.id,
                        error = %sign_error,
                        "failed to sign download url"
                    );
                    None
                }
            };
            listed.push(DocumentWithUrl {
                document,
                download_url,
            });
        }

        Ok(listed)
    }

    /// Removes a document's stored object and metadata.
    ///
    /// A failure to remove the stored object is logged and does not stop the
    /// metadata from being deleted.
    pub async fn delete(&self, case_id: CaseId, document_id: DocumentId) -> AppResult<()> {
        let document = self
            .documents
            .find_document(case_id, document_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Document not found.".to_owned()))?;

        if let Err(storage_error) = self
            .storage
            .remove_object(document.storage_path.as_str())
            .await
        {
            error!(
                document_id = %document.id,
                error = %storage_error,
                "document storage delete failed"
            );
        }

        self.documents
            .delete_document(document.id)
            .await
            .map_err(|repository_error| {
                error!(error = %repository_error, "document metadata delete failed");
                AppError::Internal("Failed to delete document record.".to_owned())
            })?;

        Ok(())
    }
}
