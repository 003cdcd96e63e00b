//! Visit entity, referenced (not owned) by the photo subsystem.
//!
//! The visit row doubles as the serialization anchor for photo quota
//! enforcement: concurrent confirms for the same visit lock it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scheduling status of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Scheduled,
    EnRoute,
    Started,
    Completed,
    Canceled,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "scheduled",
            VisitStatus::EnRoute => "en_route",
            VisitStatus::Started => "started",
            VisitStatus::Completed => "completed",
            VisitStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "scheduled" => Ok(VisitStatus::Scheduled),
            "en_route" => Ok(VisitStatus::EnRoute),
            "started" => Ok(VisitStatus::Started),
            "completed" => Ok(VisitStatus::Completed),
            "canceled" => Ok(VisitStatus::Canceled),
            other => Err(format!("unknown visit status: {}", other)),
        }
    }

    /// Whether photo operations are allowed in this status.
    /// Field workers attach evidence while travelling to, working on, or
    /// closing out a visit; scheduled and canceled visits reject edits.
    pub fn allows_photo_edits(&self) -> bool {
        matches!(
            self,
            VisitStatus::EnRoute | VisitStatus::Started | VisitStatus::Completed
        )
    }
}

/// Visit record, scoped to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub status: VisitStatus,
    /// Field worker assigned to carry out the visit, if any. Members may
    /// only touch visits assigned to them.
    pub assigned_user_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editable_statuses() {
        assert!(VisitStatus::EnRoute.allows_photo_edits());
        assert!(VisitStatus::Started.allows_photo_edits());
        assert!(VisitStatus::Completed.allows_photo_edits());
        assert!(!VisitStatus::Scheduled.allows_photo_edits());
        assert!(!VisitStatus::Canceled.allows_photo_edits());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            VisitStatus::Scheduled,
            VisitStatus::EnRoute,
            VisitStatus::Started,
            VisitStatus::Completed,
            VisitStatus::Canceled,
        ] {
            assert_eq!(VisitStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(VisitStatus::parse("archived").is_err());
    }
}
