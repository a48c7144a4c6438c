//! Trial balance aggregation.

pub mod error;
pub mod service;
pub mod types;

pub use error::ReportError;
pub use service::ReportService;
pub use types::{TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals};
