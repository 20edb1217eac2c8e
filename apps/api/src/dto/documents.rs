use hsg_application::DocumentWithUrl;
use hsg_domain::CaseDocument;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string of the document delete route.
#[derive(Debug, Deserialize)]
pub struct DeleteDocumentQuery {
    #[serde(rename = "docId")]
    pub doc_id: Option<String>,
}

/// Query string of a signed download link.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// Case document metadata.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/document-response.ts"
)]
pub struct DocumentResponse {
    pub id: String,
    pub case_id: String,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    pub storage_path: String,
    pub uploaded_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub download_url: Option<Option<String>>,
}

impl From<CaseDocument> for DocumentResponse {
    fn from(value: CaseDocument) -> Self {
        Self {
            id: value.id.to_string(),
            case_id: value.case_id.to_string(),
            filename: value.filename,
            mime: value.mime,
            size: value.size,
            storage_path: value.storage_path,
            uploaded_at: value.uploaded_at.to_rfc3339(),
            download_url: None,
        }
    }
}

impl From<DocumentWithUrl> for DocumentResponse {
    fn from(value: DocumentWithUrl) -> Self {
        Self {
            download_url: Some(value.download_url),
            ..Self::from(value.document)
        }
    }
}

/// Envelope for a case's documents.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/document-list-response.ts"
)]
pub struct DocumentListResponse {
    pub ok: bool,
    pub documents: Vec<DocumentResponse>,
}

/// Envelope for a freshly uploaded document.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/upload-document-response.ts"
)]
pub struct UploadDocumentResponse {
    pub ok: bool,
    pub document: DocumentResponse,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use hsg_application::DocumentWithUrl;
    use hsg_domain::{CaseDocument, CaseId, DocumentId};
    use serde_json::Value;

    use super::DocumentResponse;

    fn document() -> CaseDocument {
        CaseDocument {
            id: DocumentId::new(),
            case_id: CaseId::new(),
            filename: "operating agreement.pdf".to_owned(),
            mime: "application/pdf".to_owned(),
            size: 52_000,
            storage_path: "HSG-2026-1001/1770000000000-operating_agreement.pdf".to_owned(),
            uploaded_at: Utc
                .timestamp_millis_opt(1_770_000_000_000)
                .single()
                .unwrap_or_default(),
        }
    }

    #[test]
    fn listed_documents_always_carry_download_url_key() {
        let listed = DocumentResponse::from(DocumentWithUrl {
            document: document(),
            download_url: None,
        });
        let body = serde_json::to_value(listed).unwrap_or_default();

        assert_eq!(body.get("download_url"), Some(&Value::Null));
    }

    #[test]
    fn uploaded_document_has_no_download_url_key() {
        let body = serde_json::to_value(DocumentResponse::from(document())).unwrap_or_default();

        assert!(body.get("download_url").is_none());
        assert_eq!(body["filename"], "operating agreement.pdf");
    }
}
