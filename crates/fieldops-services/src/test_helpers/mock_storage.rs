//! In-memory `ObjectStorage` fake.

use async_trait::async_trait;
use chrono::Utc;
use fieldops_storage::{ObjectStorage, StorageError, StorageResult, UploadAuthorization};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Fake storage backend tracking issued authorizations and deletions.
///
/// Signed URLs embed a monotonically increasing nonce so tests can assert
/// that every listing produces freshly signed URLs rather than cached ones.
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashSet<String>>,
    deleted_keys: Mutex<Vec<String>>,
    fail_authorizations: AtomicBool,
    fail_deletes: AtomicBool,
    nonce: AtomicU64,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_authorizations(&self, fail: bool) {
        self.fail_authorizations.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Simulate a completed client upload.
    pub fn put_object(&self, storage_key: &str) {
        self.objects.lock().unwrap().insert(storage_key.to_string());
    }

    pub fn has_object(&self, storage_key: &str) -> bool {
        self.objects.lock().unwrap().contains(storage_key)
    }

    /// Keys for which deletion was attempted, in order.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted_keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn issue_upload_authorization(
        &self,
        storage_key: &str,
        content_type: &str,
        max_bytes: u64,
        expires_in: Duration,
    ) -> StorageResult<UploadAuthorization> {
        if self.fail_authorizations.load(Ordering::SeqCst) {
            return Err(StorageError::SignFailed(
                "mock storage set to fail authorizations".to_string(),
            ));
        }
        let expires_at = Utc::now()
            + chrono::Duration::from_std(expires_in)
                .map_err(|e| StorageError::SignFailed(e.to_string()))?;
        Ok(UploadAuthorization {
            url: "https://mock-bucket.example/upload".to_string(),
            fields: vec![
                ("key".to_string(), storage_key.to_string()),
                ("Content-Type".to_string(), content_type.to_string()),
                ("x-mock-max-bytes".to_string(), max_bytes.to_string()),
            ],
            expires_at,
        })
    }

    async fn issue_download_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://mock-bucket.example/{}?sig={}&expires={}",
            storage_key,
            nonce,
            expires_in.as_secs()
        ))
    }

    async fn delete_object(&self, storage_key: &str) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed(
                "mock storage set to fail deletes".to_string(),
            ));
        }
        self.deleted_keys
            .lock()
            .unwrap()
            .push(storage_key.to_string());
        // Removing a missing key is fine; absent objects are not an error.
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }
}
