//! Visit access guard: the precondition shared by every photo workflow.

use fieldops_core::models::{CallerContext, UserRole, Visit};
use fieldops_core::AppError;
use fieldops_db::VisitStore;
use std::sync::Arc;
use uuid::Uuid;

/// The operation being attempted, for validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoOperation {
    Add,
    Confirm,
    Delete,
    View,
}

impl PhotoOperation {
    pub fn describe(&self) -> &'static str {
        match self {
            PhotoOperation::Add => "add photos",
            PhotoOperation::Confirm => "confirm photos",
            PhotoOperation::Delete => "delete photos",
            PhotoOperation::View => "view photos",
        }
    }
}

/// Resolves visit existence, editability, and role-based permission.
///
/// Owner and admin operate on any visit in the tenant; members only on
/// visits assigned to them. The same rules apply to reads: a member cannot
/// view photo evidence for someone else's visit.
#[derive(Clone)]
pub struct VisitAccessGuard {
    visits: Arc<dyn VisitStore>,
}

impl VisitAccessGuard {
    pub fn new(visits: Arc<dyn VisitStore>) -> Self {
        Self { visits }
    }

    /// Load the visit and check the caller may perform `operation` on it.
    pub async fn require_visit(
        &self,
        caller: &CallerContext,
        visit_id: Uuid,
        operation: PhotoOperation,
    ) -> Result<Visit, AppError> {
        let visit = self
            .visits
            .get(caller.tenant_id, visit_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visit not found: {}", visit_id)))?;

        if !visit.status.allows_photo_edits() {
            return Err(AppError::Validation(format!(
                "Cannot {} on a visit with status {}",
                operation.describe(),
                visit.status.as_str()
            )));
        }

        if caller.role == UserRole::Member && visit.assigned_user_id != Some(caller.user_id) {
            return Err(AppError::Forbidden(
                "You are not assigned to this visit".to_string(),
            ));
        }

        Ok(visit)
    }
}
