//! Error types for period register operations.

use thiserror::Error;

use tally_shared::types::PeriodId;

use super::period::PeriodStatus;

/// Errors that can occur during period register operations.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// Period not found.
    #[error("Period not found: {0}")]
    PeriodNotFound(PeriodId),

    /// The fiscal year's periods already exist.
    #[error("Fiscal year {0} already exists")]
    YearAlreadyExists(i32),

    /// The fiscal year is outside the representable date range.
    #[error("Fiscal year {0} is out of range")]
    YearOutOfRange(i32),

    /// The requested status transition is not part of the lifecycle.
    #[error("Invalid period transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: PeriodStatus,
        /// Target status.
        to: PeriodStatus,
    },

    /// Only the current period may be closed.
    #[error("Period {period} of year {year} is not the current period")]
    NotCurrentPeriod {
        /// Fiscal year.
        year: i32,
        /// Period number.
        period: u8,
    },

    /// Periods must be opened strictly in calendar sequence.
    #[error("Period {period} of year {year} does not immediately follow the current period")]
    OutOfSequenceOpen {
        /// Fiscal year.
        year: i32,
        /// Period number.
        period: u8,
    },

    /// A later period is already open, so this one cannot be reopened.
    #[error("Cannot reopen: period {period} of year {year} is already open")]
    LaterPeriodOpen {
        /// Fiscal year of the open later period.
        year: i32,
        /// Period number of the open later period.
        period: u8,
    },

    /// The lock grace window has not elapsed since the period was closed.
    #[error("Period cannot be locked yet: {days_remaining} day(s) of the grace window remain")]
    LockGraceNotElapsed {
        /// Days left before the period may be locked.
        days_remaining: i64,
    },

    /// Only periods of a prior fiscal year may be archived.
    #[error("Cannot archive a period of fiscal year {year}: not a prior year")]
    ArchiveRequiresPriorYear {
        /// Fiscal year of the period.
        year: i32,
    },

    /// No period has been opened yet.
    #[error("No current period")]
    NoCurrentPeriod,
}

impl PeriodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::YearAlreadyExists(_) => "YEAR_ALREADY_EXISTS",
            Self::YearOutOfRange(_) => "YEAR_OUT_OF_RANGE",
            Self::InvalidTransition { .. } => "INVALID_PERIOD_TRANSITION",
            Self::NotCurrentPeriod { .. } => "NOT_CURRENT_PERIOD",
            Self::OutOfSequenceOpen { .. } => "OUT_OF_SEQUENCE_OPEN",
            Self::LaterPeriodOpen { .. } => "LATER_PERIOD_OPEN",
            Self::LockGraceNotElapsed { .. } => "LOCK_GRACE_NOT_ELAPSED",
            Self::ArchiveRequiresPriorYear { .. } => "ARCHIVE_REQUIRES_PRIOR_YEAR",
            Self::NoCurrentPeriod => "NO_CURRENT_PERIOD",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::PeriodNotFound(_) => 404,
            Self::YearAlreadyExists(_) => 409,
            Self::YearOutOfRange(_) => 400,
            Self::InvalidTransition { .. }
            | Self::NotCurrentPeriod { .. }
            | Self::OutOfSequenceOpen { .. }
            | Self::LaterPeriodOpen { .. }
            | Self::LockGraceNotElapsed { .. }
            | Self::ArchiveRequiresPriorYear { .. }
            | Self::NoCurrentPeriod => 409,
        }
    }
}
