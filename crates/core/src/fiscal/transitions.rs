//! Period lifecycle transition rules.
//!
//! The lifecycle is:
//! Future → Open → Closed → Locked → Archived, with Closed → Open
//! ("reopen") as the only backward edge. Locking is irreversible.

use super::error::PeriodError;
use super::period::PeriodStatus;

/// Returns true if the status transition is part of the lifecycle.
#[must_use]
pub fn is_valid_transition(from: PeriodStatus, to: PeriodStatus) -> bool {
    matches!(
        (from, to),
        (PeriodStatus::Future, PeriodStatus::Open)
            | (PeriodStatus::Open, PeriodStatus::Closed)
            | (PeriodStatus::Closed, PeriodStatus::Open | PeriodStatus::Locked)
            | (PeriodStatus::Locked, PeriodStatus::Archived)
    )
}

/// Validates a status transition.
///
/// # Errors
///
/// Returns `InvalidTransition` if the edge is not part of the lifecycle.
pub fn validate_status_transition(
    from: PeriodStatus,
    to: PeriodStatus,
) -> Result<(), PeriodError> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(PeriodError::InvalidTransition { from, to })
    }
}
