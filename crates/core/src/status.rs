//! Well-known status values for projects, requests, and invitations.
//!
//! Stored as TEXT and guarded by CHECK constraints in the migrations. Section
//! statuses live in [`crate::section`] next to the section catalogue.

use crate::error::CoreError;

pub const PROJECT_ACTIVE: &str = "active";
pub const PROJECT_COMPLETED: &str = "completed";

pub const REQUEST_PENDING: &str = "pending";
pub const REQUEST_APPROVED: &str = "approved";
pub const REQUEST_REJECTED: &str = "rejected";

pub const INVITATION_PENDING: &str = "pending";
pub const INVITATION_ACCEPTED: &str = "accepted";
pub const INVITATION_DECLINED: &str = "declined";

/// Decision on a pending project or guide request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Approve,
    Reject,
}

impl RequestDecision {
    /// The status value the request moves to.
    pub fn resulting_status(self) -> &'static str {
        match self {
            Self::Approve => REQUEST_APPROVED,
            Self::Reject => REQUEST_REJECTED,
        }
    }

    /// Parse a `status` field sent by the client (`approved` / `rejected`).
    pub fn from_status(status: &str) -> Result<Self, CoreError> {
        match status {
            REQUEST_APPROVED => Ok(Self::Approve),
            REQUEST_REJECTED => Ok(Self::Reject),
            other => Err(CoreError::Validation(format!(
                "Invalid decision '{other}'. Must be 'approved' or 'rejected'"
            ))),
        }
    }
}

/// Ensure a request is still open before deciding on it.
pub fn ensure_pending(current_status: &str) -> Result<(), CoreError> {
    if current_status == REQUEST_PENDING {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Request has already been {current_status}"
        )))
    }
}

/// Parse a guide's response to a HOD invitation.
pub fn parse_invitation_response(status: &str) -> Result<&'static str, CoreError> {
    match status {
        INVITATION_ACCEPTED => Ok(INVITATION_ACCEPTED),
        INVITATION_DECLINED => Ok(INVITATION_DECLINED),
        other => Err(CoreError::Validation(format!(
            "Invalid invitation response '{other}'. Must be 'accepted' or 'declined'"
        ))),
    }
}
