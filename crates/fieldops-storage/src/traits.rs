//! Storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait that storage backends must
//! implement. The photo workflows depend only on this trait, so tests run
//! against in-memory fakes and production against S3.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to sign upload authorization: {0}")]
    SignFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A short-lived credential allowing one direct multipart POST to object
/// storage. The policy behind it pins the exact key and content type and
/// enforces the byte-size ceiling server-side, so clients cannot substitute
/// a different object, type, or size at upload time.
#[derive(Debug, Clone)]
pub struct UploadAuthorization {
    /// Endpoint the client POSTs the multipart form to.
    pub url: String,
    /// Form fields that must accompany the file part, including the signed
    /// policy. Order is preserved as generated.
    pub fields: Vec<(String, String)>,
    pub expires_at: DateTime<Utc>,
}

impl UploadAuthorization {
    /// Look up a form field by name (test and client convenience).
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Object storage port consumed by the photo workflows.
///
/// The bucket is an external, independently-consistent resource: its state
/// may transiently diverge from the database. Orphaned objects are an
/// accepted failure mode; database rows referencing deleted objects are not,
/// which is why callers delete rows before objects and route object deletes
/// through a best-effort helper.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Issue a presigned upload authorization scoped to exactly `storage_key`
    /// and `content_type`, with a server-enforced byte ceiling of `max_bytes`.
    async fn issue_upload_authorization(
        &self,
        storage_key: &str,
        content_type: &str,
        max_bytes: u64,
        expires_in: Duration,
    ) -> StorageResult<UploadAuthorization>;

    /// Generate a signed GET URL for direct download, valid for `expires_in`.
    async fn issue_download_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete_object(&self, storage_key: &str) -> StorageResult<()>;
}
