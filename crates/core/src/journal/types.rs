//! Journal entry domain types.
//!
//! Amounts are carried canonically as minor-unit integers (cents) so the
//! balance invariant is exact integer equality; `Decimal` accessors are
//! provided for display and reporting.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use tally_shared::types::money::from_minor_units;
use tally_shared::types::{AccountCode, EntryId};

/// Journal entry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// General journal entry.
    General,
    /// Accrual entry.
    Accrual,
    /// Correction of a previous entry (includes reversals).
    Correction,
    /// Reclassification between accounts.
    Reclassification,
    /// Depreciation charge.
    Depreciation,
    /// Consolidation entry.
    Consolidation,
    /// Year-end closing entry.
    YearEnd,
}

impl EntryType {
    /// Returns the string representation of the entry type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Accrual => "accrual",
            Self::Correction => "correction",
            Self::Reclassification => "reclassification",
            Self::Depreciation => "depreciation",
            Self::Consolidation => "consolidation",
            Self::YearEnd => "year_end",
        }
    }

    /// Parses an entry type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(Self::General),
            "accrual" => Some(Self::Accrual),
            "correction" => Some(Self::Correction),
            "reclassification" => Some(Self::Reclassification),
            "depreciation" => Some(Self::Depreciation),
            "consolidation" => Some(Self::Consolidation),
            "year_end" => Some(Self::YearEnd),
            _ => None,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Journal entry status in the posting workflow.
///
/// The valid transitions are:
/// - Draft → Pending (submit)
/// - Pending → Posted (approve)
/// - Pending → Rejected (reject)
///
/// Posted and Rejected are terminal. A posted entry leaves the ledger only
/// through a reversal, which is a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been submitted for approval.
    Pending,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry was rejected during approval (terminal).
    Rejected,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Posted => "posted",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "posted" => Some(Self::Posted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the entry can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if no further transition exists out of this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Posted | Self::Rejected)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single debit-or-credit movement within a journal entry.
///
/// Exactly one of `debit_minor` / `credit_minor` is nonzero; this is
/// enforced by `validation::validate_line` before a line is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// 1-based line number, unique within the entry.
    pub line_no: u32,
    /// Account code this line posts to.
    pub account_code: AccountCode,
    /// Account name captured at write time for audit stability.
    pub account_name: String,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount in minor units (0 if this is a credit line).
    pub debit_minor: i64,
    /// Credit amount in minor units (0 if this is a debit line).
    pub credit_minor: i64,
    /// Optional analysis / cost-center code.
    pub analysis_code: Option<String>,
    /// Optional reference.
    pub reference: Option<String>,
}

impl JournalLine {
    /// Debit amount as a decimal.
    #[must_use]
    pub fn debit(&self) -> Decimal {
        from_minor_units(self.debit_minor)
    }

    /// Credit amount as a decimal.
    #[must_use]
    pub fn credit(&self) -> Decimal {
        from_minor_units(self.credit_minor)
    }
}

/// Input for creating or replacing a journal line.
///
/// Amounts arrive as decimals from the caller and are converted to minor
/// units during validation.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// Account code to post to.
    pub account_code: AccountCode,
    /// Optional line description.
    pub description: Option<String>,
    /// Debit amount (must be >= 0).
    pub debit: Decimal,
    /// Credit amount (must be >= 0).
    pub credit: Decimal,
    /// Optional analysis / cost-center code.
    pub analysis_code: Option<String>,
    /// Optional reference.
    pub reference: Option<String>,
}

/// Persisted entry totals, recomputed on every line mutation.
///
/// Never trusted from a client; always derived from the owned lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total debits in minor units.
    pub debit_minor: i64,
    /// Total credits in minor units.
    pub credit_minor: i64,
}

impl EntryTotals {
    /// Computes totals from a set of lines.
    #[must_use]
    pub fn from_lines(lines: &[JournalLine]) -> Self {
        Self {
            debit_minor: lines.iter().map(|l| l.debit_minor).sum(),
            credit_minor: lines.iter().map(|l| l.credit_minor).sum(),
        }
    }

    /// Total debits as a decimal.
    #[must_use]
    pub fn debit(&self) -> Decimal {
        from_minor_units(self.debit_minor)
    }

    /// Total credits as a decimal.
    #[must_use]
    pub fn credit(&self) -> Decimal {
        from_minor_units(self.credit_minor)
    }

    /// True if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit_minor == self.credit_minor
    }
}

/// A journal entry: header plus owned lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Entry number, sequentially assigned per fiscal year.
    pub entry_no: u32,
    /// Fiscal year the entry belongs to.
    pub fiscal_year: i32,
    /// Fiscal period number (1-13) within the year.
    pub period_no: u8,
    /// Date of the entry.
    pub entry_date: NaiveDate,
    /// Entry classification.
    pub entry_type: EntryType,
    /// Free-text reference (e.g. document number).
    pub reference: Option<String>,
    /// Entry description.
    pub description: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Current workflow status.
    pub status: EntryStatus,
    /// Owned lines, ordered by line number.
    pub lines: Vec<JournalLine>,
    /// Persisted totals, kept consistent with `lines`.
    pub totals: EntryTotals,
    /// Entry number of the reversing entry, once reversed.
    pub reversed_by: Option<u32>,
    /// The entry this one reverses, if it is a reversing entry.
    pub reverses: Option<EntryId>,
    /// Reason supplied when the entry was rejected.
    pub rejection_reason: Option<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was submitted for approval.
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Recomputes persisted totals from the owned lines.
    pub fn recompute_totals(&mut self) {
        self.totals = EntryTotals::from_lines(&self.lines);
    }

    /// Returns true if the entry has been reversed.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed_by.is_some()
    }

    /// Returns true if this entry itself reverses another entry.
    #[must_use]
    pub fn is_reversal(&self) -> bool {
        self.reverses.is_some()
    }
}

/// Partial update for a draft entry's header fields.
#[derive(Debug, Clone, Default)]
pub struct HeaderPatch {
    /// New entry date.
    pub entry_date: Option<NaiveDate>,
    /// New entry type.
    pub entry_type: Option<EntryType>,
    /// New reference.
    pub reference: Option<Option<String>>,
    /// New description.
    pub description: Option<String>,
    /// New notes.
    pub notes: Option<Option<String>>,
}
