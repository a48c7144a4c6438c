//! In-process ledger state for Tally.
//!
//! Holds the journal store and period register behind a single
//! `parking_lot::RwLock`, so every compound operation (post an entry and
//! bump the period totals, reverse an entry and mark its source) runs as
//! one critical section. The account directory sits behind a trait seam
//! so a chart-of-accounts service can be plugged in later.

pub mod accounts;
pub mod journal;
pub mod periods;
pub mod service;

pub use accounts::{AccountDirectory, AccountRecord, InMemoryAccountDirectory};
pub use journal::{EntryFilter, JournalStore};
pub use periods::PeriodRegister;
pub use service::{GeneralLedger, NewEntry};
