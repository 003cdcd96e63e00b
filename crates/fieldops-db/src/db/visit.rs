//! Read-only repository for visits.
//!
//! Visits are owned by the scheduling subsystem; the photo workflows only
//! need existence, status, and assignment for the access guard.

use crate::store_traits::VisitStore;
use async_trait::async_trait;
use fieldops_core::models::{Visit, VisitStatus};
use fieldops_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct VisitRepository {
    pool: PgPool,
}

impl VisitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_visit_row(row: &PgRow) -> Result<Visit, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = VisitStatus::parse(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".into(),
            source: e.into(),
        })?;

        Ok(Visit {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            status,
            assigned_user_id: row.try_get("assigned_user_id")?,
        })
    }
}

#[async_trait]
impl VisitStore for VisitRepository {
    async fn get(&self, tenant_id: Uuid, visit_id: Uuid) -> Result<Option<Visit>, AppError> {
        let row = sqlx::query(
            "SELECT id, tenant_id, status, assigned_user_id FROM visits WHERE id = $1 AND tenant_id = $2",
        )
        .bind(visit_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(Self::parse_visit_row)
            .transpose()
            .map_err(AppError::from)
    }
}
