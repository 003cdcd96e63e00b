//! Database repositories for the data access layer.
//!
//! Each repository owns the queries for a single entity and implements the
//! corresponding store trait from [`crate::store_traits`]. All queries are
//! tenant-scoped; tenancy is part of every WHERE clause, never an
//! afterthought.

pub mod audit;
pub mod visit;
pub mod visit_photo;

pub use audit::AuditLogRepository;
pub use visit::VisitRepository;
pub use visit_photo::VisitPhotoRepository;
