//! Business rule validation for journal entries and lines.
//!
//! Balance is evaluated on minor-unit integer sums, never on decimals or
//! floats, so the invariant carries zero tolerance and no accumulation
//! error.

use rust_decimal::Decimal;

use tally_shared::types::money::to_minor_units;

use super::error::LedgerError;
use super::types::{EntryStatus, EntryTotals, JournalLine, LineInput};

/// Validated amounts of a single line, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// Debit amount in minor units.
    pub debit_minor: i64,
    /// Credit amount in minor units.
    pub credit_minor: i64,
}

/// Validates a line input's amounts and converts them to minor units.
///
/// A valid line carries exactly one nonzero side, both sides non-negative
/// and representable in minor units.
///
/// # Errors
///
/// Returns `NegativeAmount`, `AmountPrecision`, `DoubleSidedLine` or
/// `EmptyLine` for the given line number.
pub fn validate_line(line_no: u32, input: &LineInput) -> Result<LineAmounts, LedgerError> {
    if input.debit < Decimal::ZERO || input.credit < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount { line: line_no });
    }

    let debit_minor =
        to_minor_units(input.debit).map_err(|_| LedgerError::AmountPrecision { line: line_no })?;
    let credit_minor =
        to_minor_units(input.credit).map_err(|_| LedgerError::AmountPrecision { line: line_no })?;

    match (debit_minor, credit_minor) {
        (0, 0) => Err(LedgerError::EmptyLine { line: line_no }),
        (d, c) if d != 0 && c != 0 => Err(LedgerError::DoubleSidedLine { line: line_no }),
        _ => Ok(LineAmounts {
            debit_minor,
            credit_minor,
        }),
    }
}

/// Validates that an entry's lines exist and balance exactly.
///
/// # Errors
///
/// Returns `NoLines` for an empty entry, or `UnbalancedEntry` with the
/// decimal totals when debits differ from credits.
pub fn validate_balance(lines: &[JournalLine]) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoLines);
    }

    let totals = EntryTotals::from_lines(lines);
    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit(),
            credit: totals.credit(),
        });
    }

    Ok(totals)
}

/// Validates that an entry can be modified (lines or header).
///
/// # Errors
///
/// Returns `NotEditable` unless the entry is in draft.
pub fn validate_can_modify(status: EntryStatus) -> Result<(), LedgerError> {
    if status.is_editable() {
        Ok(())
    } else {
        Err(LedgerError::NotEditable(status))
    }
}

/// Validates that an entry can be deleted.
///
/// Only draft entries may be deleted; posted entries must be reversed to
/// preserve the audit trail.
///
/// # Errors
///
/// Returns `CanOnlyDeleteDraft` unless the entry is in draft.
pub fn validate_can_delete(status: EntryStatus) -> Result<(), LedgerError> {
    if status == EntryStatus::Draft {
        Ok(())
    } else {
        Err(LedgerError::CanOnlyDeleteDraft)
    }
}
