//! Shared key generation for storage backends.
//!
//! Key format: `tenants/{tenant_id}/visits/{visit_id}/photos/{photo_id}.{ext}`.

use uuid::Uuid;

/// Derive the deterministic object key for a visit photo.
///
/// The key is computed once at create time and immutable afterwards; every
/// component is server-controlled, so a client holding an upload
/// authorization can only ever write the object the server intended.
pub fn photo_storage_key(tenant_id: Uuid, visit_id: Uuid, photo_id: Uuid, extension: &str) -> String {
    format!(
        "tenants/{}/visits/{}/photos/{}.{}",
        tenant_id, visit_id, photo_id, extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic_and_scoped() {
        let tenant = Uuid::from_u128(1);
        let visit = Uuid::from_u128(2);
        let photo = Uuid::from_u128(3);
        let key = photo_storage_key(tenant, visit, photo, "jpg");
        assert_eq!(
            key,
            format!("tenants/{}/visits/{}/photos/{}.jpg", tenant, visit, photo)
        );
        assert_eq!(key, photo_storage_key(tenant, visit, photo, "jpg"));
    }
}
