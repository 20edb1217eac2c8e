//! Filesystem document storage with signed download links.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hsg_application::DocumentStorage;
use hmac::{Hmac, Mac};
use hsg_core::{AppError, AppResult};
use sha2::Sha256;
use tokio::io::AsyncWriteExt;

type HmacSha256 = Hmac<Sha256>;

/// Minimum accepted length of the URL signing secret.
pub const MIN_URL_SECRET_LENGTH: usize = 32;

/// Stores document bytes under a root directory and signs download links.
///
/// Links point at `{public_url}/api/documents/download/{key}` and carry
/// `expires` (unix seconds) and `signature` query parameters. The signature
/// is a hex HMAC-SHA256 of `{key}\n{expires}` keyed by the URL secret.
#[derive(Clone)]
pub struct LocalDocumentStorage {
    root: PathBuf,
    public_url: String,
    mac: HmacSha256,
}

impl LocalDocumentStorage {
    /// Creates a storage adapter rooted at `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        public_url: impl Into<String>,
        secret: impl Into<String>,
    ) -> AppResult<Self> {
        let secret = secret.into();
        if secret.len() < MIN_URL_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "document URL secret must be at least {MIN_URL_SECRET_LENGTH} characters"
            )));
        }

        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|error| AppError::Validation(format!("invalid URL secret: {error}")))?;

        Ok(Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_owned(),
            mac,
        })
    }

    /// Computes the hex signature for a key and expiry.
    #[must_use]
    pub fn signature(&self, key: &str, expires: i64) -> String {
        hex::encode(self.keyed_mac(key, expires).finalize().into_bytes())
    }

    /// Returns whether a download link is authentic and unexpired.
    #[must_use]
    pub fn verify_signature(
        &self,
        key: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> bool {
        if now.timestamp() > expires {
            return false;
        }

        let Ok(presented) = hex::decode(signature) else {
            return false;
        };

        self.keyed_mac(key, expires)
            .verify_slice(&presented)
            .is_ok()
    }

    fn keyed_mac(&self, key: &str, expires: i64) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    /// Reads an object, returning `None` when it does not exist.
    pub async fn read_object(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let path = self.object_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read document '{key}': {error}"
            ))),
        }
    }

    fn object_path(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        let is_safe = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_safe {
            return Err(AppError::Validation(format!(
                "invalid document key '{key}'"
            )));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    async fn put_object(&self, key: &str, bytes: &[u8], _content_type: &str) -> AppResult<()> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create document directory for '{key}': {error}"
                ))
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|error| {
                if error.kind() == ErrorKind::AlreadyExists {
                    AppError::Conflict(format!("document '{key}' already exists"))
                } else {
                    AppError::Internal(format!("failed to create document '{key}': {error}"))
                }
            })?;

        file.write_all(bytes).await.map_err(|error| {
            AppError::Internal(format!("failed to write document '{key}': {error}"))
        })?;
        file.flush().await.map_err(|error| {
            AppError::Internal(format!("failed to flush document '{key}': {error}"))
        })
    }

    async fn remove_object(&self, key: &str) -> AppResult<()> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove document '{key}': {error}"
            ))),
        }
    }

    async fn signed_url(&self, key: &str, expires_at: DateTime<Utc>) -> AppResult<String> {
        self.object_path(key)?;
        let expires = expires_at.timestamp();

        Ok(format!(
            "{}/api/documents/download/{key}?expires={expires}&signature={}",
            self.public_url,
            self.signature(key, expires)
        ))
    }
}

/// Returns the content type implied by a stored key's extension.
#[must_use]
pub fn content_type_for_key(key: &str) -> &'static str {
    let extension = Path::new(key)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}
