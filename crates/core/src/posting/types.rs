//! Posting workflow actions.

use chrono::{DateTime, Utc};

use crate::journal::EntryStatus;

/// A validated state transition with audit data.
///
/// Each variant captures the action performed, the resulting status, and
/// the audit trail information to persist alongside the status change.
#[derive(Debug, Clone)]
pub enum PostingAction {
    /// Submit a draft entry for approval.
    Submit {
        /// The new status after submission (Pending).
        new_status: EntryStatus,
        /// When the entry was submitted.
        submitted_at: DateTime<Utc>,
    },
    /// Approve (post) a pending entry.
    Approve {
        /// The new status after approval (Posted).
        new_status: EntryStatus,
        /// When the entry was posted.
        posted_at: DateTime<Utc>,
    },
    /// Reject a pending entry.
    Reject {
        /// The new status after rejection (Rejected).
        new_status: EntryStatus,
        /// The reason for rejection.
        reason: String,
    },
}

impl PostingAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> EntryStatus {
        match self {
            Self::Submit { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. } => *new_status,
        }
    }
}
