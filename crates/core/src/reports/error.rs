//! Error types for report generation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested period range is malformed.
    #[error("Invalid period range: {from}..{to}")]
    InvalidPeriodRange {
        /// First period of the range.
        from: u8,
        /// Last period of the range.
        to: u8,
    },

    /// Aggregate debits and credits disagree.
    ///
    /// The posting guards make this unreachable; seeing it means a prior
    /// defect let an unbalanced entry through, so it is always surfaced,
    /// never tolerated.
    #[error("Ledger integrity violated: aggregate debits ({debit}) != credits ({credit})")]
    Integrity {
        /// Aggregate debit total.
        debit: Decimal,
        /// Aggregate credit total.
        credit: Decimal,
    },
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPeriodRange { .. } => "INVALID_PERIOD_RANGE",
            Self::Integrity { .. } => "INTEGRITY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidPeriodRange { .. } => 400,
            Self::Integrity { .. } => 500,
        }
    }
}
