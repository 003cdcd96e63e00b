//! Visit photo workflows: create, confirm, delete, list.

use crate::access::{PhotoOperation, VisitAccessGuard};
use crate::best_effort::{discard_object, record_audit};
use chrono::Utc;
use fieldops_core::constants::{
    DOWNLOAD_URL_TTL_SECS, MAX_PENDING_UPLOADS_PER_VISIT, MAX_PHOTO_SIZE_BYTES,
    MAX_READY_PHOTOS_PER_VISIT, STALE_PENDING_MINUTES, UPLOAD_AUTHORIZATION_TTL_SECS,
};
use fieldops_core::models::{
    AuditAction, AuditEvent, CallerContext, PhotoContentType, PhotoStatus, VisitPhoto,
};
use fieldops_core::AppError;
use fieldops_db::{AuditStore, ConfirmOutcome, VisitPhotoStore, VisitStore};
use fieldops_storage::{photo_storage_key, ObjectStorage, UploadAuthorization};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Result of requesting a new photo upload: the pending record plus the
/// short-lived authorization the client uploads against.
#[derive(Debug, Clone)]
pub struct CreatedPhoto {
    pub photo: VisitPhoto,
    pub upload: UploadAuthorization,
}

/// A ready photo enriched with a freshly signed download URL. The URL is
/// computed per request and never persisted.
#[derive(Debug, Clone)]
pub struct PhotoWithUrl {
    pub photo: VisitPhoto,
    pub download_url: String,
}

/// Service implementing the photo-evidence workflows.
pub struct VisitPhotoService {
    photos: Arc<dyn VisitPhotoStore>,
    guard: VisitAccessGuard,
    storage: Arc<dyn ObjectStorage>,
    audit: Arc<dyn AuditStore>,
}

impl VisitPhotoService {
    pub fn new(
        visits: Arc<dyn VisitStore>,
        photos: Arc<dyn VisitPhotoStore>,
        storage: Arc<dyn ObjectStorage>,
        audit: Arc<dyn AuditStore>,
    ) -> Self {
        Self {
            photos,
            guard: VisitAccessGuard::new(visits),
            storage,
            audit,
        }
    }

    /// Authorize a new photo upload for a visit.
    ///
    /// Reaps stale pending records first, then checks quotas, then asks
    /// storage for an upload authorization, and only then inserts the
    /// pending record. The ordering is deliberate: if the authorization
    /// request fails there must be no database row, since a row pointing at
    /// an upload that can never happen is worse than no row at all.
    #[tracing::instrument(
        skip(self, file_name),
        fields(tenant_id = %caller.tenant_id, visit_id = %visit_id, operation = "create_photo")
    )]
    pub async fn create_photo(
        &self,
        caller: &CallerContext,
        visit_id: Uuid,
        file_name: &str,
        content_type: &str,
    ) -> Result<CreatedPhoto, AppError> {
        if file_name.trim().is_empty() {
            return Err(AppError::Validation("File name must not be empty".to_string()));
        }
        let kind = PhotoContentType::from_mime(content_type).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported content type: {}. Allowed types: {}",
                content_type,
                PhotoContentType::ALLOWED_MIME_TYPES.join(", ")
            ))
        })?;

        self.guard
            .require_visit(caller, visit_id, PhotoOperation::Add)
            .await?;

        self.reap_stale_pending(caller.tenant_id, visit_id).await?;

        let ready_count = self
            .photos
            .count_ready_by_visit(caller.tenant_id, visit_id)
            .await?;
        if ready_count >= MAX_READY_PHOTOS_PER_VISIT {
            return Err(AppError::QuotaExceeded(format!(
                "Maximum of {} photos per visit",
                MAX_READY_PHOTOS_PER_VISIT
            )));
        }

        let pending_count = self
            .photos
            .count_pending_by_visit(caller.tenant_id, visit_id)
            .await?;
        if pending_count >= MAX_PENDING_UPLOADS_PER_VISIT {
            return Err(AppError::Validation(format!(
                "Too many pending uploads for this visit (limit {}). Confirm them or wait for them to expire",
                MAX_PENDING_UPLOADS_PER_VISIT
            )));
        }

        let photo_id = Uuid::new_v4();
        let storage_key =
            photo_storage_key(caller.tenant_id, visit_id, photo_id, kind.extension());

        // Authorization before insert; see method docs for why.
        let upload = self
            .storage
            .issue_upload_authorization(
                &storage_key,
                kind.mime(),
                MAX_PHOTO_SIZE_BYTES,
                Duration::from_secs(UPLOAD_AUTHORIZATION_TTL_SECS),
            )
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let photo = VisitPhoto {
            id: photo_id,
            tenant_id: caller.tenant_id,
            visit_id,
            storage_key,
            file_name: file_name.to_string(),
            content_type: kind.mime().to_string(),
            size_bytes: None,
            status: PhotoStatus::Pending,
            created_at: Utc::now(),
        };
        self.photos.create(&photo).await?;

        record_audit(
            self.audit.as_ref(),
            AuditEvent::photo(
                caller.tenant_id,
                caller.user_id,
                AuditAction::PhotoUploadRequested,
                photo.id,
                Some(serde_json::json!({
                    "visit_id": visit_id,
                    "file_name": photo.file_name,
                    "content_type": photo.content_type,
                })),
            ),
        )
        .await;

        Ok(CreatedPhoto { photo, upload })
    }

    /// Promote a pending photo to ready once its upload completed.
    ///
    /// Safe under arbitrary retries, duplicate calls, and concurrent
    /// workers: the store primitive serializes on the visit row and refuses
    /// to promote past the quota, and a no-op against an already-ready
    /// photo reports idempotent success.
    #[tracing::instrument(
        skip(self),
        fields(tenant_id = %caller.tenant_id, visit_id = %visit_id, photo_id = %photo_id, operation = "confirm_photo")
    )]
    pub async fn confirm_photo(
        &self,
        caller: &CallerContext,
        visit_id: Uuid,
        photo_id: Uuid,
    ) -> Result<VisitPhoto, AppError> {
        self.guard
            .require_visit(caller, visit_id, PhotoOperation::Confirm)
            .await?;

        self.load_bound_photo(caller.tenant_id, visit_id, photo_id)
            .await?;

        let outcome = self
            .photos
            .confirm_upload(caller.tenant_id, photo_id, MAX_READY_PHOTOS_PER_VISIT)
            .await?;

        match outcome {
            ConfirmOutcome::Promoted(photo) => {
                record_audit(
                    self.audit.as_ref(),
                    AuditEvent::photo(
                        caller.tenant_id,
                        caller.user_id,
                        AuditAction::PhotoConfirmed,
                        photo.id,
                        Some(serde_json::json!({ "visit_id": visit_id })),
                    ),
                )
                .await;
                Ok(photo)
            }
            // The primitive aborted without mutating; re-fetch to find out why.
            ConfirmOutcome::NoOp => {
                match self.photos.get_by_id(caller.tenant_id, photo_id).await? {
                    Some(photo)
                        if photo.visit_id == visit_id && photo.status == PhotoStatus::Ready =>
                    {
                        // Already promoted, by us or by a concurrent call:
                        // idempotent success.
                        Ok(photo)
                    }
                    Some(photo) if photo.visit_id == visit_id => {
                        Err(AppError::QuotaExceeded("Photo quota exceeded".to_string()))
                    }
                    _ => Err(AppError::NotFound(format!("Photo not found: {}", photo_id))),
                }
            }
        }
    }

    /// Delete a photo record and (best-effort) its storage object.
    ///
    /// The row goes first: it is the source of truth, and a surviving
    /// object with no row is invisible and harmless, while a row pointing
    /// at a deleted object must never occur. Deletion applies to pending
    /// and ready photos alike.
    #[tracing::instrument(
        skip(self),
        fields(tenant_id = %caller.tenant_id, visit_id = %visit_id, photo_id = %photo_id, operation = "delete_photo")
    )]
    pub async fn delete_photo(
        &self,
        caller: &CallerContext,
        visit_id: Uuid,
        photo_id: Uuid,
    ) -> Result<(), AppError> {
        self.guard
            .require_visit(caller, visit_id, PhotoOperation::Delete)
            .await?;

        let photo = self
            .load_bound_photo(caller.tenant_id, visit_id, photo_id)
            .await?;

        self.photos.delete(caller.tenant_id, photo_id).await?;
        discard_object(self.storage.as_ref(), &photo.storage_key).await;

        record_audit(
            self.audit.as_ref(),
            AuditEvent::photo(
                caller.tenant_id,
                caller.user_id,
                AuditAction::PhotoDeleted,
                photo_id,
                Some(serde_json::json!({
                    "visit_id": visit_id,
                    "file_name": photo.file_name,
                })),
            ),
        )
        .await;

        Ok(())
    }

    /// List ready photos for a visit, each with a fresh signed download URL.
    #[tracing::instrument(
        skip(self),
        fields(tenant_id = %caller.tenant_id, visit_id = %visit_id, operation = "list_photos")
    )]
    pub async fn list_photos(
        &self,
        caller: &CallerContext,
        visit_id: Uuid,
    ) -> Result<Vec<PhotoWithUrl>, AppError> {
        self.guard
            .require_visit(caller, visit_id, PhotoOperation::View)
            .await?;

        let photos = self
            .photos
            .list_ready_by_visit(caller.tenant_id, visit_id)
            .await?;

        let mut listed = Vec::with_capacity(photos.len());
        for photo in photos {
            let download_url = self
                .storage
                .issue_download_url(
                    &photo.storage_key,
                    Duration::from_secs(DOWNLOAD_URL_TTL_SECS),
                )
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
            listed.push(PhotoWithUrl {
                photo,
                download_url,
            });
        }

        Ok(listed)
    }

    /// Load a photo and verify it belongs to the supplied visit. A photo
    /// existing in the tenant but under a different visit is treated
    /// identically to a nonexistent one.
    async fn load_bound_photo(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
        photo_id: Uuid,
    ) -> Result<VisitPhoto, AppError> {
        match self.photos.get_by_id(tenant_id, photo_id).await? {
            Some(photo) if photo.visit_id == visit_id => Ok(photo),
            _ => Err(AppError::NotFound(format!("Photo not found: {}", photo_id))),
        }
    }

    /// Remove abandoned pending uploads for a visit and try to clean up
    /// their storage objects. Record deletion is authoritative and
    /// propagates errors; object deletion is best-effort.
    async fn reap_stale_pending(&self, tenant_id: Uuid, visit_id: Uuid) -> Result<(), AppError> {
        let reaped = self
            .photos
            .delete_stale_pending(tenant_id, visit_id, STALE_PENDING_MINUTES)
            .await?;

        for photo in &reaped {
            discard_object(self.storage.as_ref(), &photo.storage_key).await;
        }

        Ok(())
    }
}
