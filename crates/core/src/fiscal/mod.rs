//! Fiscal period model and lifecycle rules.

pub mod error;
pub mod period;
pub mod transitions;

pub use error::PeriodError;
pub use period::{generate_year_periods, Period, PeriodStatus, PeriodType, ADJUSTMENT_PERIOD_NO};
pub use transitions::{is_valid_transition, validate_status_transition};
