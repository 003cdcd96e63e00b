//! Domain models shared across Fieldops components.

pub mod audit;
pub mod caller;
pub mod visit;
pub mod visit_photo;

pub use audit::{AuditAction, AuditEvent};
pub use caller::{CallerContext, UserRole};
pub use visit::{Visit, VisitStatus};
pub use visit_photo::{PhotoContentType, PhotoStatus, VisitPhoto};
