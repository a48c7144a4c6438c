//! Core posting and period-control logic for Tally.
//!
//! This crate implements the general-ledger engine:
//! - Journal entry and line model with persisted totals
//! - Balance and line validation on minor-unit integers
//! - The entry state machine (submit / approve / reject)
//! - Fiscal period model and lifecycle transitions
//! - Reversal construction (mirror entries)
//! - Trial balance aggregation with integrity checking
//!
//! Everything here is pure logic: storage and the account directory are
//! injected by the caller (see the `tally-store` crate).

pub mod fiscal;
pub mod journal;
pub mod posting;
pub mod reports;
pub mod reversal;

pub use fiscal::{Period, PeriodError, PeriodStatus, PeriodType};
pub use journal::{
    EntryStatus, EntryTotals, EntryType, HeaderPatch, JournalEntry, JournalLine, LedgerError,
    LineInput,
};
pub use posting::{PostingAction, PostingEngine};
pub use reports::{ReportError, ReportService, TrialBalanceReport, TrialBalanceRow};
pub use reversal::{ReversalDraft, ReversalService};
