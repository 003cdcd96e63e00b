//! Audit event model.
//!
//! Audit writes are observability, not business state: they are emitted
//! best-effort and must never gate the operation they describe.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Actions recorded by the photo subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    PhotoUploadRequested,
    PhotoConfirmed,
    PhotoDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::PhotoUploadRequested => "photo_upload_requested",
            AuditAction::PhotoConfirmed => "photo_confirmed",
            AuditAction::PhotoDeleted => "photo_deleted",
        }
    }
}

/// Structured audit log entry.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub action: AuditAction,
    pub entity_type: &'static str,
    pub entity_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn photo(
        tenant_id: Uuid,
        user_id: Uuid,
        action: AuditAction,
        photo_id: Uuid,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            tenant_id,
            user_id,
            action,
            entity_type: "visit_photo",
            entity_id: photo_id,
            details,
            occurred_at: Utc::now(),
        }
    }
}
