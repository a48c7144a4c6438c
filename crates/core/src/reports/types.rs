//! Trial balance report types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_shared::types::AccountCode;

/// Per-account debit/credit sums over the report range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account code.
    pub account_code: AccountCode,
    /// The account name as captured on the posted lines.
    pub account_name: String,
    /// Sum of posted debits.
    pub debit: Decimal,
    /// Sum of posted credits.
    pub credit: Decimal,
}

/// Report-wide totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Aggregate debit total.
    pub total_debit: Decimal,
    /// Aggregate credit total.
    pub total_credit: Decimal,
    /// Whether the aggregate debits equal the aggregate credits.
    pub is_balanced: bool,
}

/// A trial balance over a period range of one fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// The fiscal year reported on.
    pub fiscal_year: i32,
    /// First period of the range (inclusive).
    pub period_from: u8,
    /// Last period of the range (inclusive).
    pub period_to: u8,
    /// Per-account rows, sorted by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Report-wide totals.
    pub totals: TrialBalanceTotals,
}
