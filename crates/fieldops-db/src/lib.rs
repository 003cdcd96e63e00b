//! Fieldops Database Layer
//!
//! This crate provides the Postgres repositories behind the visit photo
//! subsystem, plus the store trait abstractions the workflows (and their
//! test mocks) are written against.

pub mod db;
pub mod store_traits;

// Re-exports: repositories
pub use db::{AuditLogRepository, VisitPhotoRepository, VisitRepository};

// Re-exports: store traits and the confirm primitive's outcome
pub use store_traits::{AuditStore, ConfirmOutcome, VisitPhotoStore, VisitStore};

/// Embedded migrations for the photo-evidence schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
