//! Behavioral constants forming the photo-evidence contract.
//!
//! These values are part of the external contract (clients and tests rely on
//! them); changing one is a breaking change for API consumers.

/// Maximum confirmed (ready) photos per visit. Enforced atomically under the
/// visit row lock; never exceeded even under concurrent confirms.
pub const MAX_READY_PHOTOS_PER_VISIT: i64 = 20;

/// Soft cap on unconfirmed (pending) uploads per visit. Races may transiently
/// exceed it; the stale reaper corrects the count over time.
pub const MAX_PENDING_UPLOADS_PER_VISIT: i64 = 5;

/// Byte-size ceiling enforced by the upload authorization (10 MiB).
pub const MAX_PHOTO_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Pending records older than this are considered abandoned and reclaimed.
pub const STALE_PENDING_MINUTES: i64 = 15;

/// Validity window for direct-upload authorizations.
pub const UPLOAD_AUTHORIZATION_TTL_SECS: u64 = 900;

/// Validity window for signed download URLs returned by list.
pub const DOWNLOAD_URL_TTL_SECS: u64 = 3600;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_size_ceiling_matches_contract() {
        assert_eq!(MAX_PHOTO_SIZE_BYTES, 10_485_760);
    }
}
