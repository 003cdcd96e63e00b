//! Fieldops object storage layer.
//!
//! Defines the `ObjectStorage` trait consumed by the photo workflows and the
//! S3 implementation backing it. Photo bytes never pass through the
//! application: clients upload directly against a scope-pinned POST policy
//! and read through short-lived signed GET URLs.
//!
//! **Key format:** `tenants/{tenant_id}/visits/{visit_id}/photos/{photo_id}.{ext}`.
//! See [`keys::photo_storage_key`].

pub mod keys;
pub mod post_policy;
pub mod s3;
pub mod traits;

pub use keys::photo_storage_key;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult, UploadAuthorization};
