//! Repository for the audit log.

use crate::store_traits::AuditStore;
use async_trait::async_trait;
use fieldops_core::models::AuditEvent;
use fieldops_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Append-only audit log writer. Callers treat failures as best-effort;
/// this repository itself reports them normally.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn record(&self, event: &AuditEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (
                id, tenant_id, user_id, action, entity_type, entity_id, details, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.tenant_id)
        .bind(event.user_id)
        .bind(event.action.as_str())
        .bind(event.entity_type)
        .bind(event.entity_id)
        .bind(&event.details)
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
