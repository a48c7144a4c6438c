//! Core shared types.

pub mod account;
pub mod id;
pub mod money;

pub use account::AccountCode;
pub use id::{EntryId, PeriodId};
pub use money::{from_minor_units, to_minor_units, MinorUnitError};
