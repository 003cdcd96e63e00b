//! In-memory store implementations backed by mutex-guarded maps.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use fieldops_core::models::{AuditEvent, PhotoStatus, Visit, VisitPhoto};
use fieldops_core::AppError;
use fieldops_db::{AuditStore, ConfirmOutcome, VisitPhotoStore, VisitStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Visit lookup backed by a map. Visits are seeded by tests, never mutated.
#[derive(Default)]
pub struct MockVisitStore {
    visits: Mutex<HashMap<Uuid, Visit>>,
}

impl MockVisitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, visit: Visit) {
        self.visits
            .lock()
            .unwrap()
            .insert(visit.id, visit);
    }
}

#[async_trait]
impl VisitStore for MockVisitStore {
    async fn get(&self, tenant_id: Uuid, visit_id: Uuid) -> Result<Option<Visit>, AppError> {
        let visits = self.visits.lock().unwrap();
        Ok(visits
            .get(&visit_id)
            .filter(|v| v.tenant_id == tenant_id)
            .cloned())
    }
}

/// Photo store holding records in a map. `confirm_upload` performs its whole
/// check-and-promote under one lock acquisition, mirroring the transactional
/// guarantee of the Postgres implementation.
#[derive(Default)]
pub struct MockVisitPhotoStore {
    photos: Mutex<HashMap<Uuid, VisitPhoto>>,
}

impl MockVisitPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, photo: VisitPhoto) {
        self.photos
            .lock()
            .unwrap()
            .insert(photo.id, photo);
    }

    pub fn status_of(&self, photo_id: Uuid) -> Option<PhotoStatus> {
        self.photos
            .lock()
            .unwrap()
            .get(&photo_id)
            .map(|p| p.status)
    }

    pub fn contains(&self, photo_id: Uuid) -> bool {
        self.photos.lock().unwrap().contains_key(&photo_id)
    }
}

#[async_trait]
impl VisitPhotoStore for MockVisitPhotoStore {
    async fn create(&self, photo: &VisitPhoto) -> Result<(), AppError> {
        self.photos
            .lock()
            .unwrap()
            .insert(photo.id, photo.clone());
        Ok(())
    }

    async fn get_by_id(
        &self,
        tenant_id: Uuid,
        photo_id: Uuid,
    ) -> Result<Option<VisitPhoto>, AppError> {
        let photos = self.photos.lock().unwrap();
        Ok(photos
            .get(&photo_id)
            .filter(|p| p.tenant_id == tenant_id)
            .cloned())
    }

    async fn confirm_upload(
        &self,
        tenant_id: Uuid,
        photo_id: Uuid,
        max_ready: i64,
    ) -> Result<ConfirmOutcome, AppError> {
        let mut photos = self.photos.lock().unwrap();

        let (visit_id, status) = match photos.get(&photo_id) {
            Some(p) if p.tenant_id == tenant_id => (p.visit_id, p.status),
            _ => return Ok(ConfirmOutcome::NoOp),
        };
        if status != PhotoStatus::Pending {
            return Ok(ConfirmOutcome::NoOp);
        }

        let ready_count = photos
            .values()
            .filter(|p| {
                p.tenant_id == tenant_id
                    && p.visit_id == visit_id
                    && p.status == PhotoStatus::Ready
            })
            .count() as i64;
        if ready_count >= max_ready {
            return Ok(ConfirmOutcome::NoOp);
        }

        let photo = photos
            .get_mut(&photo_id)
            .ok_or_else(|| AppError::Internal("photo vanished under lock".to_string()))?;
        photo.status = PhotoStatus::Ready;
        Ok(ConfirmOutcome::Promoted(photo.clone()))
    }

    async fn list_ready_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<Vec<VisitPhoto>, AppError> {
        let photos = self.photos.lock().unwrap();
        let mut ready: Vec<VisitPhoto> = photos
            .values()
            .filter(|p| {
                p.tenant_id == tenant_id
                    && p.visit_id == visit_id
                    && p.status == PhotoStatus::Ready
            })
            .cloned()
            .collect();
        ready.sort_by_key(|p| p.created_at);
        Ok(ready)
    }

    async fn delete(&self, tenant_id: Uuid, photo_id: Uuid) -> Result<(), AppError> {
        let mut photos = self.photos.lock().unwrap();
        if photos
            .get(&photo_id)
            .is_some_and(|p| p.tenant_id == tenant_id)
        {
            photos.remove(&photo_id);
        }
        Ok(())
    }

    async fn count_ready_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<i64, AppError> {
        let photos = self.photos.lock().unwrap();
        Ok(photos
            .values()
            .filter(|p| {
                p.tenant_id == tenant_id
                    && p.visit_id == visit_id
                    && p.status == PhotoStatus::Ready
            })
            .count() as i64)
    }

    async fn count_pending_by_visit(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
    ) -> Result<i64, AppError> {
        let photos = self.photos.lock().unwrap();
        Ok(photos
            .values()
            .filter(|p| {
                p.tenant_id == tenant_id
                    && p.visit_id == visit_id
                    && p.status == PhotoStatus::Pending
            })
            .count() as i64)
    }

    async fn delete_stale_pending(
        &self,
        tenant_id: Uuid,
        visit_id: Uuid,
        older_than_minutes: i64,
    ) -> Result<Vec<VisitPhoto>, AppError> {
        let cutoff = Utc::now() - ChronoDuration::minutes(older_than_minutes);
        let mut photos = self.photos.lock().unwrap();
        let stale_ids: Vec<Uuid> = photos
            .values()
            .filter(|p| {
                p.tenant_id == tenant_id
                    && p.visit_id == visit_id
                    && p.status == PhotoStatus::Pending
                    && p.created_at < cutoff
            })
            .map(|p| p.id)
            .collect();
        let mut removed = Vec::with_capacity(stale_ids.len());
        for id in stale_ids {
            if let Some(photo) = photos.remove(&id) {
                removed.push(photo);
            }
        }
        Ok(removed)
    }
}

/// Audit sink collecting events in memory, with a switch to simulate write
/// failures.
#[derive(Default)]
pub struct MockAuditStore {
    events: Mutex<Vec<AuditEvent>>,
    fail_writes: AtomicBool,
}

impl MockAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MockAuditStore {
    async fn record(&self, event: &AuditEvent) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("audit sink unavailable".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
