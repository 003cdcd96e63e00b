//! Best-effort side effects.
//!
//! The database is authoritative; storage-object deletion and audit writes
//! are observability or cleanup, and must never block or fail the primary
//! operation. Concentrating the swallow-and-log behavior here keeps that
//! contract auditable in one place instead of scattered across workflows.

use fieldops_core::models::AuditEvent;
use fieldops_db::AuditStore;
use fieldops_storage::ObjectStorage;

/// Delete a storage object, logging and swallowing any failure.
///
/// An orphaned object is invisible and harmless; the caller has already
/// removed (or never created) the database row that would reference it.
pub async fn discard_object(storage: &dyn ObjectStorage, storage_key: &str) {
    if let Err(e) = storage.delete_object(storage_key).await {
        tracing::warn!(
            error = %e,
            storage_key = %storage_key,
            "Failed to delete storage object; leaving orphan behind"
        );
    }
}

/// Record an audit event, logging and swallowing any failure.
pub async fn record_audit(audit: &dyn AuditStore, event: AuditEvent) {
    if let Err(e) = audit.record(&event).await {
        tracing::warn!(
            error = %e,
            action = event.action.as_str(),
            entity_id = %event.entity_id,
            "Failed to write audit event"
        );
    }
}
