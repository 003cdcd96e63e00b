//! Caller identity as supplied by the (external) authentication layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of the authenticated user within their tenant.
///
/// Owner and admin operate on any visit in the tenant; members are
/// restricted to visits assigned to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Admin,
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

/// Validated caller context.
///
/// Tenant isolation is already applied upstream: every id in here has been
/// authenticated and parsed before the workflows see it.
#[derive(Debug, Clone, Copy)]
pub struct CallerContext {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
}

impl CallerContext {
    pub fn new(tenant_id: Uuid, user_id: Uuid, role: UserRole) -> Self {
        Self {
            tenant_id,
            user_id,
            role,
        }
    }
}
