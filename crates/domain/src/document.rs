//! Case document metadata and upload rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CaseId, CaseNumber, DocumentId};

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Content types accepted for case documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentMime {
    /// `application/pdf`
    Pdf,
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
}

impl DocumentMime {
    /// Returns the MIME string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Matches a client-supplied content type against the allow list.
    #[must_use]
    pub fn from_content_type(value: &str) -> Option<Self> {
        match value {
            "application/pdf" => Some(Self::Pdf),
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Document metadata persisted alongside the stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDocument {
    /// Document identifier.
    pub id: DocumentId,
    /// Owning case.
    pub case_id: CaseId,
    /// Original filename as uploaded.
    pub filename: String,
    /// Content type.
    pub mime: String,
    /// Size in bytes.
    pub size: i64,
    /// Key of the stored object.
    pub storage_path: String,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-') {
                character
            } else {
                '_'
            }
        })
        .collect()
}

/// Builds the storage key `{case_number}/{uploaded_at_millis}-{sanitized_name}`.
#[must_use]
pub fn document_storage_path(
    case_number: &CaseNumber,
    uploaded_at: DateTime<Utc>,
    filename: &str,
) -> String {
    format!(
        "{}/{}-{}",
        case_number.as_str(),
        uploaded_at.timestamp_millis(),
        sanitize_filename(filename)
    )
}
