//! Review status shared by break and leave requests.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The review state of a break or leave request.
///
/// Requests start as [`RequestStatus::Pending`]; HR moves them to approved or
/// rejected, and the requester may cancel while still pending. The other
/// three states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Accepted by HR.
    Approved,
    /// Declined by HR.
    Rejected,
    /// Withdrawn by the requester.
    Cancelled,
}

impl RequestStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// True for requests that still block the time they cover.
    ///
    /// ```
    /// use workforce_engine::models::RequestStatus;
    ///
    /// assert!(RequestStatus::Pending.is_active());
    /// assert!(RequestStatus::Approved.is_active());
    /// assert!(!RequestStatus::Rejected.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Approved)
    }

    /// Validates a status change and returns the new status.
    ///
    /// Only pending requests can change state.
    pub fn transition(self, entity: &str, id: &str, to: RequestStatus) -> EngineResult<Self> {
        if self == RequestStatus::Pending && to != RequestStatus::Pending {
            return Ok(to);
        }
        Err(EngineError::InvalidTransition {
            entity: entity.to_string(),
            id: id.to_string(),
            from: self.as_str().to_string(),
            to: to.as_str().to_string(),
        })
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
