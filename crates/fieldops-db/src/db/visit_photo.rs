//! Repository for visit photo records.

use crate::store_traits::{ConfirmOutcome, VisitPhotoStore};
use async_trait::async_trait;
use fieldops_core::models::{PhotoStatus, VisitPhoto};
use fieldops_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const PHOTO_COLUMNS: &str =
    "id, tenant_id, visit_id, storage_key, file_name, content_type, size_bytes, status, created_at";

/// Postgres-backed photo record store.
#[derive(Clone)]
pub struct VisitPhotoRepository {
    pool: PgPool,
}

impl VisitPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn parse_photo_row(row: &PgRow) -> Result<VisitPhoto, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = PhotoStatus::parse(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".into(),
            source: e.into(),
        })?;

        Ok(VisitPhoto {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            visit_id: row.try_get("visit_id")?,
            storage_key: row.try_get("storage_key")?,
            file_name: row.try_get("file_name")?,
            content_type: row.try_get("content_type")?,
            size_bytes: row.try_get("size_bytes")?,
            status,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl VisitPhotoStore for VisitPhotoRepository {
    async fn create(&self, photo: &VisitPhoto) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO visit_photos (
                id, tenant_id, visit_id, storage_key, file_name,
                content_type, size_bytes, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(photo.id)
        .bind(photo.tenant_id)
        .bind(photo.visit_id)
        .bind(&photo.storage_key)
        .bind(&photo.file_name)
        .bind(&photo.content_type)
        .bind(photo.size_bytes)
        .bind(photo.status.as_str())
        .bind(photo.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(
        &self,
        tenant_id: Uuid,
        photo_id: Uuid,
    ) -> Result<Option<VisitPhoto>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {PHOTO_COLUMNS} FROM visit_photos WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(photo_id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::parse_photo_row).transpose().map_err(AppError::from)
    }

    /// The critical promotion primitive.
    ///
    /// Runs as one transaction: reload the photo, take an exclusive row
    /// lock on the parent visit (serializing every concurrent confirm for
    /// that visit), recount ready photos inside the lock, and promote with
    /// a conditional `status = 'pending'` predicate. The predicate guards
    /// against a second confirm of the identical photo id racing the lock
    /// holder. Any abort leaves the database untouched and reports `NoOp`;
    /// the caller disambiguates by re-fetching.
    async fn confirm_upload(
        &self,
        tenant_id: Uuid,
        photo_id: Uuid,
        max_ready: i64,
    ) -> Result<ConfirmOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {PHOTO_COLUMNS} FROM visit_photos WHERE id = $1 AND tenant_id = $2"
        ))
        .bind(photo_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?;

        let photo = match row.as_ref().map(Self::parse_photo_row).transpose()? {
            Some(photo) => photo,
            None => {
                tx.rollback().await.ok();
                return Ok(ConfirmOutcome::NoOp);
            }
        };
        if photo.status != PhotoStatus::Pending {
            tx.rollback().await.ok();
            return Ok(ConfirmOutcome::NoOp);
        }

        // Exclusive lock on the parent visit: the only serialization point
        // for the ready-count invariant.
        let visit_locked = sqlx::query("SELECT id FROM visits WHERE id = $1 AND tenant_id = $2 FOR UPDATE")
            .bind(photo.visit_id)
            .bind(tenant_id)
            .fetch_optional(&mut *tx)
            .await?;
        if visit_locked.is_none() {
            tx.rollback().await.ok();
            return Ok(ConfirmOutcome::NoOp);
        }

        let ready_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visit_photos WHERE tenant_id = $1 AND visit_id = $2 AND status = 'ready'",
        )
        .bind(tenant_id)
        .bind(photo.visit_id)
        .fetch_one(&mut *tx)
        .await?;

        if ready_count >= max_ready {
            tx.rollback().await.ok();
            return Ok(ConfirmOutcome::NoOp);
        }

        let updated = sqlx::query(&format!(
            "UPDATE visit_photos SET status = 'ready'
             WHERE id = $1 AND tenant_id = $2 AND status = 'pending'
             RETURNING {PHOTO_COLUMNS}"
        ))
        .bind(photo_id)
        .bind(tenant_id)
        .fetch_optional(&mut *tx)
        .await?;

        match updated.as_ref().map(Self::parse_photo_row).transpose()? {
            Some(promoted) => {
                tx.commit().await?;
                tracing::info!(
                    tenant_id = %tenant_id,
                    visit_id = %promoted.visit_id,
                    photo_id = %photo_id,
                    ready_count = ready_count + 1,
                    "Photo promoted to ready"
                );
                Ok(ConfirmOutcome::Promoted(promoted))
            }
            None => {
                tx.rollback().await.ok();
                Ok(ConfirmOutcome::NoOp)
            }
        }
    }

    async fn list_ready_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<Vec<VisitPhoto>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {PHOTO_COLUMNS} FROM visit_photos
             WHERE tenant_id = $1 AND visit_id = $2 AND status = 'ready'
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(tenant_id)
        .bind(visit_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Self::parse_photo_row(row).map_err(AppError::from))
            .collect()
    }

    async fn delete(&self, tenant_id: Uuid, photo_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM visit_photos WHERE id = $1 AND tenant_id = $2")
            .bind(photo_id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_ready_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visit_photos WHERE tenant_id = $1 AND visit_id = $2 AND status = 'ready'",
        )
        .bind(tenant_id)
        .bind(visit_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_pending_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM visit_photos WHERE tenant_id = $1 AND visit_id = $2 AND status = 'pending'",
        )
        .bind(tenant_id)
        .bind(visit_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn delete_stale_pending(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
        older_than_minutes: i64,
    ) -> Result<Vec<VisitPhoto>, AppError> {
        let rows = sqlx::query(&format!(
            "DELETE FROM visit_photos
             WHERE tenant_id = $1 AND visit_id = $2 AND status = 'pending'
               AND created_at < NOW() - make_interval(mins => $3::int)
             RETURNING {PHOTO_COLUMNS}"
        ))
        .bind(tenant_id)
        .bind(visit_id)
        .bind(older_than_minutes as i32)
        .fetch_all(&self.pool)
        .await?;

        let deleted: Result<Vec<_>, _> = rows
            .iter()
            .map(|row| Self::parse_photo_row(row).map_err(AppError::from))
            .collect();
        let deleted = deleted?;

        if !deleted.is_empty() {
            tracing::info!(
                tenant_id = %tenant_id,
                visit_id = %visit_id,
                reaped = deleted.len(),
                "Reaped stale pending photos"
            );
        }

        Ok(deleted)
    }
}
