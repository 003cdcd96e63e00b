//! In-memory fakes for the store and storage ports.
//!
//! Used by this crate's integration tests; exported so downstream crates can
//! exercise the workflows without Postgres or S3.

mod mock_storage;
mod mock_stores;

pub use mock_storage::MockStorage;
pub use mock_stores::{MockAuditStore, MockVisitPhotoStore, MockVisitStore};
