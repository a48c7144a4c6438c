//! Error types for journal and posting operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use tally_shared::types::{AccountCode, EntryId};

use super::types::EntryStatus;

/// Broad error classification used by callers that only care about the
/// category of failure (e.g. for user-facing messaging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input (bad account code, double-sided line, ...).
    Validation,
    /// Operation not permitted in the current entry/period state.
    InvalidState,
    /// Debits and credits are not equal.
    Unbalanced,
    /// The target fiscal period does not accept postings.
    PeriodClosed,
    /// A line's account no longer allows postings.
    InvalidAccount,
    /// The entry has already been reversed.
    AlreadyReversed,
    /// An invariant was violated at read time; indicates a defect.
    Integrity,
}

/// Errors that can occur during journal and posting operations.
///
/// All failures are deterministic given current state: nothing here is
/// transient, so the engine never retries.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Account code is not present in the account directory.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountCode),

    /// Account exists but does not accept direct postings.
    #[error("Account {0} does not allow posting")]
    AccountPostingNotAllowed(AccountCode),

    /// Line has both a debit and a credit amount.
    #[error("Line {line} has both debit and credit amounts")]
    DoubleSidedLine {
        /// The offending line number.
        line: u32,
    },

    /// Line has neither a debit nor a credit amount.
    #[error("Line {line} has neither debit nor credit amount")]
    EmptyLine {
        /// The offending line number.
        line: u32,
    },

    /// Line amount is negative.
    #[error("Line {line} has a negative amount")]
    NegativeAmount {
        /// The offending line number.
        line: u32,
    },

    /// Line amount carries sub-cent precision.
    #[error("Line {line} amount is not representable in minor units")]
    AmountPrecision {
        /// The offending line number.
        line: u32,
    },

    /// No fiscal period exists for the given (year, period) key.
    #[error("Fiscal period {period} of year {year} does not exist")]
    PeriodNotFound {
        /// Fiscal year.
        year: i32,
        /// Period number.
        period: u8,
    },

    /// No fiscal period covers the given date.
    #[error("No fiscal period found for date {0}")]
    NoPeriodForDate(NaiveDate),

    /// A reason is required for this operation.
    #[error("A reason is required")]
    ReasonRequired,

    // ========== State Errors ==========
    /// The requested status transition is not part of the state machine.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: EntryStatus,
        /// Target status.
        to: EntryStatus,
    },

    /// The entry is not editable in its current status.
    #[error("Entry cannot be modified in status {0}")]
    NotEditable(EntryStatus),

    /// Only draft entries may be deleted; others must be reversed.
    #[error("Can only delete draft entries")]
    CanOnlyDeleteDraft,

    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Entry has no lines.
    #[error("Entry must have at least one line")]
    NoLines,

    /// No line with the given number exists on the entry.
    #[error("Line {line} not found on entry")]
    LineNotFound {
        /// The requested line number.
        line: u32,
    },

    // ========== Balance Errors ==========
    /// Debits and credits are not equal.
    #[error("Entry is unbalanced: debits ({debit}) != credits ({credit})")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Period Gating ==========
    /// The target fiscal period is not open for posting.
    #[error("Fiscal period {period} of year {year} is not open for posting")]
    PeriodClosed {
        /// Fiscal year.
        year: i32,
        /// Period number.
        period: u8,
    },

    // ========== Reversal Errors ==========
    /// Only posted entries can be reversed.
    #[error("Only posted entries can be reversed (entry is {0})")]
    OnlyPostedCanBeReversed(EntryStatus),

    /// The entry has already been reversed.
    #[error("Entry {entry_no} was already reversed by entry {reversed_by}")]
    AlreadyReversed {
        /// The source entry number.
        entry_no: u32,
        /// The entry number of the reversing entry.
        reversed_by: u32,
    },

    /// A reversing entry cannot itself be reversed.
    #[error("A reversing entry cannot be reversed; create a new manual entry instead")]
    CannotReverseReversal,

    /// Reversal is dated before the original entry and policy forbids it.
    #[error("Reversal date {reversal_date} precedes the original entry date {entry_date}")]
    BackdatedReversal {
        /// Date of the original entry.
        entry_date: NaiveDate,
        /// Requested reversal date.
        reversal_date: NaiveDate,
    },

    // ========== Integrity Errors ==========
    /// Persisted totals disagree with the owned lines; indicates a defect.
    #[error("Stored totals for entry {entry_no} disagree with its lines")]
    StoredTotalsMismatch {
        /// The offending entry number.
        entry_no: u32,
    },
}

impl LedgerError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownAccount(_)
            | Self::DoubleSidedLine { .. }
            | Self::EmptyLine { .. }
            | Self::NegativeAmount { .. }
            | Self::AmountPrecision { .. }
            | Self::PeriodNotFound { .. }
            | Self::NoPeriodForDate(_)
            | Self::ReasonRequired => ErrorKind::Validation,

            Self::InvalidTransition { .. }
            | Self::NotEditable(_)
            | Self::CanOnlyDeleteDraft
            | Self::EntryNotFound(_)
            | Self::NoLines
            | Self::LineNotFound { .. }
            | Self::OnlyPostedCanBeReversed(_) => ErrorKind::InvalidState,

            Self::UnbalancedEntry { .. } => ErrorKind::Unbalanced,
            Self::PeriodClosed { .. } => ErrorKind::PeriodClosed,
            Self::AccountPostingNotAllowed(_) => ErrorKind::InvalidAccount,
            Self::AlreadyReversed { .. }
            | Self::CannotReverseReversal
            | Self::BackdatedReversal { .. } => ErrorKind::AlreadyReversed,
            Self::StoredTotalsMismatch { .. } => ErrorKind::Integrity,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::AccountPostingNotAllowed(_) => "ACCOUNT_POSTING_NOT_ALLOWED",
            Self::DoubleSidedLine { .. } => "DOUBLE_SIDED_LINE",
            Self::EmptyLine { .. } => "EMPTY_LINE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::AmountPrecision { .. } => "AMOUNT_PRECISION",
            Self::PeriodNotFound { .. } => "PERIOD_NOT_FOUND",
            Self::NoPeriodForDate(_) => "NO_PERIOD_FOR_DATE",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::CanOnlyDeleteDraft => "CAN_ONLY_DELETE_DRAFT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::NoLines => "NO_LINES",
            Self::LineNotFound { .. } => "LINE_NOT_FOUND",
            Self::OnlyPostedCanBeReversed(_) => "ONLY_POSTED_CAN_BE_REVERSED",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::PeriodClosed { .. } => "PERIOD_CLOSED",
            Self::AlreadyReversed { .. } => "ALREADY_REVERSED",
            Self::CannotReverseReversal => "CANNOT_REVERSE_REVERSAL",
            Self::BackdatedReversal { .. } => "BACKDATED_REVERSAL",
            Self::StoredTotalsMismatch { .. } => "INTEGRITY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Unbalanced => 400,
            ErrorKind::InvalidState => match self {
                Self::EntryNotFound(_) | Self::LineNotFound { .. } => 404,
                _ => 409,
            },
            ErrorKind::PeriodClosed
            | ErrorKind::InvalidAccount
            | ErrorKind::AlreadyReversed => 422,
            ErrorKind::Integrity => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::NoLines.error_code(), "NO_LINES");
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: dec!(100),
                credit: dec!(90),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::PeriodClosed { year: 2026, period: 3 }.error_code(),
            "PERIOD_CLOSED"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            LedgerError::DoubleSidedLine { line: 2 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            LedgerError::NotEditable(EntryStatus::Posted).kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            LedgerError::AccountPostingNotAllowed(AccountCode::new("9999")).kind(),
            ErrorKind::InvalidAccount
        );
        assert_eq!(
            LedgerError::StoredTotalsMismatch { entry_no: 7 }.kind(),
            ErrorKind::Integrity
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::NoLines.http_status_code(), 409);
        assert_eq!(
            LedgerError::EntryNotFound(EntryId::from_uuid(uuid::Uuid::nil())).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::EmptyLine { line: 1 }.http_status_code(),
            400
        );
        assert_eq!(
            LedgerError::PeriodClosed { year: 2026, period: 1 }.http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::StoredTotalsMismatch { entry_no: 1 }.http_status_code(),
            500
        );
    }

    #[test]
    fn test_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(90.00),
        };
        assert_eq!(
            err.to_string(),
            "Entry is unbalanced: debits (100.00) != credits (90.00)"
        );
    }
}
