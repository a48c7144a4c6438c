//! Journal entry domain model and validation.
//!
//! This module defines the journal entry aggregate (header + lines),
//! its status and type enumerations, the error type shared by all
//! ledger operations, and the balance/line validation rules.

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::{ErrorKind, LedgerError};
pub use types::{
    EntryStatus, EntryTotals, EntryType, HeaderPatch, JournalEntry, JournalLine, LineInput,
};
pub use validation::{
    validate_balance, validate_can_delete, validate_can_modify, validate_line, LineAmounts,
};
