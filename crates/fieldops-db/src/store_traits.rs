//! Store trait abstractions for the photo workflows.
//!
//! These traits define the persistence interface the workflows need,
//! allowing mocking and testing without database dependencies. The Postgres
//! implementations live in [`crate::db`].

use async_trait::async_trait;
use fieldops_core::models::{AuditEvent, Visit, VisitPhoto};
use fieldops_core::AppError;
use uuid::Uuid;

/// Outcome of the atomic `confirm_upload` primitive.
///
/// `NoOp` deliberately does not say why nothing happened (already ready,
/// quota full, or row gone): the store cannot distinguish those without
/// holding the lock longer than necessary, and the workflow disambiguates
/// by re-fetching.
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// The photo was promoted to ready within this call.
    Promoted(VisitPhoto),
    /// The transaction aborted without mutating anything.
    NoOp,
}

/// Read access to visits (owned by the scheduling subsystem).
#[async_trait]
pub trait VisitStore: Send + Sync {
    async fn get(&self, tenant_id: Uuid, visit_id: Uuid) -> Result<Option<Visit>, AppError>;
}

/// Photo record store: CRUD plus the quota-checked promotion primitive.
#[async_trait]
pub trait VisitPhotoStore: Send + Sync {
    async fn create(&self, photo: &VisitPhoto) -> Result<(), AppError>;

    async fn get_by_id(
        &self,
        tenant_id: Uuid,
        photo_id: Uuid,
    ) -> Result<Option<VisitPhoto>, AppError>;

    /// Atomically promote a pending photo to ready, enforcing `max_ready`
    /// per visit. Must execute as a single transaction that serializes on
    /// the parent visit record; see `VisitPhotoRepository::confirm_upload`
    /// for the reference semantics every implementation must uphold.
    async fn confirm_upload(
        &self,
        tenant_id: Uuid,
        photo_id: Uuid,
        max_ready: i64,
    ) -> Result<ConfirmOutcome, AppError>;

    /// Ready photos only; pending uploads never surface to readers.
    async fn list_ready_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<Vec<VisitPhoto>, AppError>;

    async fn delete(&self, tenant_id: Uuid, photo_id: Uuid) -> Result<(), AppError>;

    async fn count_ready_by_visit(&self, tenant_id: Uuid, visit_id: Uuid)
        -> Result<i64, AppError>;

    async fn count_pending_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<i64, AppError>;

    /// Delete pending photos older than `older_than_minutes` for one visit,
    /// returning the deleted records so the caller can attempt storage
    /// cleanup for each.
    async fn delete_stale_pending(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
        older_than_minutes: i64,
    ) -> Result<Vec<VisitPhoto>, AppError>;
}

/// Audit log sink. Call sites treat writes as best-effort.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record(&self, event: &AuditEvent) -> Result<(), AppError>;
}
