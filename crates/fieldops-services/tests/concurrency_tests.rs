//! Concurrency tests: the ready quota must hold under parallel confirms,
//! and duplicate confirms of the same photo must both succeed while
//! promoting exactly once.

use chrono::Utc;
use fieldops_core::constants::MAX_READY_PHOTOS_PER_VISIT;
use fieldops_core::models::{
    AuditAction, CallerContext, PhotoStatus, UserRole, Visit, VisitPhoto, VisitStatus,
};
use fieldops_core::AppError;
use fieldops_db::VisitPhotoStore;
use fieldops_services::test_helpers::{
    MockAuditStore, MockStorage, MockVisitPhotoStore, MockVisitStore,
};
use fieldops_services::VisitPhotoService;
use std::sync::Arc;
use uuid::Uuid;

fn build_service() -> (
    Arc<VisitPhotoService>,
    Arc<MockVisitPhotoStore>,
    Arc<MockAuditStore>,
    CallerContext,
    Uuid,
) {
    let visits = Arc::new(MockVisitStore::new());
    let photos = Arc::new(MockVisitPhotoStore::new());
    let storage = Arc::new(MockStorage::new());
    let audit = Arc::new(MockAuditStore::new());

    let tenant_id = Uuid::new_v4();
    let visit_id = Uuid::new_v4();
    visits.insert(Visit {
        id: visit_id,
        tenant_id,
        status: VisitStatus::Started,
        assigned_user_id: None,
    });

    let service = Arc::new(VisitPhotoService::new(
        visits,
        photos.clone(),
        storage,
        audit.clone(),
    ));
    let caller = CallerContext::new(tenant_id, Uuid::new_v4(), UserRole::Admin);
    (service, photos, audit, caller, visit_id)
}

fn seed_pending(photos: &MockVisitPhotoStore, tenant_id: Uuid, visit_id: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    photos.insert(VisitPhoto {
        id,
        tenant_id,
        visit_id,
        storage_key: format!(
            "tenants/{}/visits/{}/photos/{}.jpg",
            tenant_id, visit_id, id
        ),
        file_name: "evidence.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        size_bytes: None,
        status: PhotoStatus::Pending,
        created_at: Utc::now(),
    });
    id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_confirms_never_exceed_ready_quota() {
    let (service, photos, _audit, caller, visit_id) = build_service();

    let over_quota = MAX_READY_PHOTOS_PER_VISIT + 5;
    let pending_ids: Vec<Uuid> = (0..over_quota)
        .map(|_| seed_pending(&photos, caller.tenant_id, visit_id))
        .collect();

    let mut handles = Vec::new();
    for photo_id in pending_ids {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.confirm_photo(&caller, visit_id, photo_id).await
        }));
    }

    let mut promoted = 0i64;
    let mut quota_rejections = 0i64;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(photo) => {
                assert_eq!(photo.status, PhotoStatus::Ready);
                promoted += 1;
            }
            Err(AppError::QuotaExceeded(_)) => quota_rejections += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(promoted, MAX_READY_PHOTOS_PER_VISIT);
    assert_eq!(quota_rejections, over_quota - MAX_READY_PHOTOS_PER_VISIT);
    assert_eq!(
        photos
            .count_ready_by_visit(caller.tenant_id, visit_id)
            .await
            .unwrap(),
        MAX_READY_PHOTOS_PER_VISIT
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_confirms_of_same_photo_promote_once() {
    let (service, photos, audit, caller, visit_id) = build_service();
    let photo_id = seed_pending(&photos, caller.tenant_id, visit_id);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.confirm_photo(&caller, visit_id, photo_id).await
        }));
    }

    for handle in handles {
        let photo = handle.await.unwrap().unwrap();
        assert_eq!(photo.status, PhotoStatus::Ready);
    }

    assert_eq!(photos.status_of(photo_id), Some(PhotoStatus::Ready));

    // Exactly one of the racers actually promoted, so exactly one audit
    // event exists.
    let confirm_events: Vec<_> = audit
        .events()
        .into_iter()
        .filter(|e| e.action == AuditAction::PhotoConfirmed)
        .collect();
    assert_eq!(confirm_events.len(), 1);
}
