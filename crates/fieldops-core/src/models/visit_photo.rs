//! Visit photo attachment model and its lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a photo record.
///
/// `Pending` means an upload authorization was issued but the client has not
/// confirmed the upload; `Ready` means the photo is confirmed and counted
/// against the visit quota. The only transition is `Pending -> Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStatus {
    Pending,
    Ready,
}

impl PhotoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoStatus::Pending => "pending",
            PhotoStatus::Ready => "ready",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "pending" => Ok(PhotoStatus::Pending),
            "ready" => Ok(PhotoStatus::Ready),
            other => Err(format!("unknown photo status: {}", other)),
        }
    }
}

/// One photographic attachment to a visit.
///
/// `created_at` is the only timestamp: the single mutation is the one-way
/// pending-to-ready promotion, and deletion removes the row outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitPhoto {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub visit_id: Uuid,
    /// Deterministic object key, immutable once created.
    pub storage_key: String,
    pub file_name: String,
    pub content_type: String,
    /// Unknown until the upload completes.
    pub size_bytes: Option<i64>,
    pub status: PhotoStatus,
    pub created_at: DateTime<Utc>,
}

/// Accepted photo content types and their storage extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoContentType {
    Jpeg,
    Png,
    Heic,
    Webp,
}

impl PhotoContentType {
    /// All accepted MIME types, for validation error messages.
    pub const ALLOWED_MIME_TYPES: [&'static str; 4] =
        ["image/jpeg", "image/png", "image/heic", "image/webp"];

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(PhotoContentType::Jpeg),
            "image/png" => Some(PhotoContentType::Png),
            "image/heic" => Some(PhotoContentType::Heic),
            "image/webp" => Some(PhotoContentType::Webp),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            PhotoContentType::Jpeg => "image/jpeg",
            PhotoContentType::Png => "image/png",
            PhotoContentType::Heic => "image/heic",
            PhotoContentType::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PhotoContentType::Jpeg => "jpg",
            PhotoContentType::Png => "png",
            PhotoContentType::Heic => "heic",
            PhotoContentType::Webp => "webp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(
            PhotoContentType::from_mime("image/jpeg"),
            Some(PhotoContentType::Jpeg)
        );
        assert_eq!(PhotoContentType::Jpeg.extension(), "jpg");
        assert_eq!(PhotoContentType::Webp.extension(), "webp");
        assert_eq!(PhotoContentType::from_mime("application/pdf"), None);
        assert_eq!(PhotoContentType::from_mime("image/gif"), None);
    }

    #[test]
    fn test_photo_status_parse() {
        assert_eq!(PhotoStatus::parse("pending").unwrap(), PhotoStatus::Pending);
        assert_eq!(PhotoStatus::parse("ready").unwrap(), PhotoStatus::Ready);
        assert!(PhotoStatus::parse("uploaded").is_err());
    }
}
