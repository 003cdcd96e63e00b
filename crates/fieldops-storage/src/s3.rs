//! S3 storage implementation.

use crate::post_policy::{sign_post_policy, PostPolicyRequest};
use crate::traits::{ObjectStorage, StorageError, StorageResult, UploadAuthorization};
use async_trait::async_trait;
use chrono::Utc;
use fieldops_core::config::StorageConfig;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::ObjectStoreExt;
use std::time::Duration;

/// S3 (or S3-compatible) storage backend.
///
/// Signed GET URLs come from the `object_store` signer; upload
/// authorizations are SigV4 POST policies signed locally from the same
/// credentials, since a POST policy is the only presigned form that can pin
/// a `content-length-range` ceiling.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    config: StorageConfig,
}

impl S3Storage {
    /// Create a new S3Storage instance from storage configuration.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_region(config.region.clone())
            .with_bucket_name(config.bucket.clone())
            .with_access_key_id(config.access_key_id.clone())
            .with_secret_access_key(config.secret_access_key.clone());

        if let Some(ref token) = config.session_token {
            builder = builder.with_token(token.clone());
        }
        if let Some(ref endpoint) = config.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, config })
    }

    /// Endpoint clients POST multipart uploads to.
    ///
    /// Path-style for custom endpoints (MinIO and friends), virtual-hosted
    /// style for AWS proper.
    fn post_url(&self) -> String {
        if let Some(ref endpoint) = self.config.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}", base_url, self.config.bucket)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com",
                self.config.bucket, self.config.region
            )
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn issue_upload_authorization(
        &self,
        storage_key: &str,
        content_type: &str,
        max_bytes: u64,
        expires_in: Duration,
    ) -> StorageResult<UploadAuthorization> {
        let request = PostPolicyRequest {
            bucket: &self.config.bucket,
            region: &self.config.region,
            key: storage_key,
            content_type,
            max_bytes,
            access_key_id: &self.config.access_key_id,
            secret_access_key: &self.config.secret_access_key,
            session_token: self.config.session_token.as_deref(),
        };
        let (fields, expires_at) = sign_post_policy(&request, Utc::now(), expires_in);

        tracing::info!(
            bucket = %self.config.bucket,
            key = %storage_key,
            content_type = %content_type,
            max_bytes,
            expires_at = %expires_at,
            "Issued upload authorization"
        );

        Ok(UploadAuthorization {
            url: self.post_url(),
            fields,
            expires_at,
        })
    }

    async fn issue_download_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(storage_key.to_string());
        let url = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        Ok(url.to_string())
    }

    async fn delete_object(&self, storage_key: &str) -> StorageResult<()> {
        let location = Path::from(storage_key.to_string());

        match self.store.delete(&location).await {
            Ok(()) => {
                tracing::info!(
                    bucket = %self.config.bucket,
                    key = %storage_key,
                    "S3 delete successful"
                );
                Ok(())
            }
            // Already gone is the outcome we wanted
            Err(ObjectStoreError::NotFound { .. }) => Ok(()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.config.bucket,
                    key = %storage_key,
                    "S3 delete failed"
                );
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> StorageConfig {
        StorageConfig {
            bucket: "fieldops-media".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: endpoint.map(String::from),
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
        }
    }

    #[test]
    fn test_post_url_virtual_hosted_for_aws() {
        let storage = S3Storage::new(config(None)).unwrap();
        assert_eq!(
            storage.post_url(),
            "https://fieldops-media.s3.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn test_post_url_path_style_for_custom_endpoint() {
        let storage = S3Storage::new(config(Some("http://localhost:9000/"))).unwrap();
        assert_eq!(storage.post_url(), "http://localhost:9000/fieldops-media");
    }
}
