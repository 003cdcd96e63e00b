//! Fieldops visit photo workflows.
//!
//! The four photo-evidence operations (create, confirm, delete, list) plus
//! the shared visit access guard. Workflow logic talks only to the store
//! traits from `fieldops-db` and the `ObjectStorage` trait from
//! `fieldops-storage`, so everything here is testable against in-memory
//! mocks (see [`test_helpers`]).

pub mod access;
pub mod best_effort;
pub mod photos;
pub mod test_helpers;

pub use access::{PhotoOperation, VisitAccessGuard};
pub use photos::{CreatedPhoto, PhotoWithUrl, VisitPhotoService};
