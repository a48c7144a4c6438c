//! Trial balance generation.

use std::collections::BTreeMap;

use tally_shared::types::money::from_minor_units;
use tally_shared::types::AccountCode;

use crate::fiscal::ADJUSTMENT_PERIOD_NO;
use crate::journal::{EntryStatus, JournalEntry};

use super::error::ReportError;
use super::types::{TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals};

/// Service for generating the trial balance.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance over `period_from..=period_to` of one
    /// fiscal year.
    ///
    /// Only Posted entries contribute. Reversed source entries and their
    /// reversing entries are both included; they net to zero per account,
    /// which is exactly the correctness check a reader performs.
    ///
    /// The report's own totals must balance: the posting guards make
    /// anything else unreachable, so an imbalance is surfaced as an
    /// integrity failure.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriodRange` for a malformed range, or
    /// `Integrity` when aggregate debits and credits disagree.
    pub fn trial_balance(
        entries: &[JournalEntry],
        fiscal_year: i32,
        period_from: u8,
        period_to: u8,
    ) -> Result<TrialBalanceReport, ReportError> {
        if period_from == 0 || period_from > period_to || period_to > ADJUSTMENT_PERIOD_NO {
            return Err(ReportError::InvalidPeriodRange {
                from: period_from,
                to: period_to,
            });
        }

        let mut sums: BTreeMap<AccountCode, (String, i64, i64)> = BTreeMap::new();

        for entry in entries {
            if entry.status != EntryStatus::Posted
                || entry.fiscal_year != fiscal_year
                || entry.period_no < period_from
                || entry.period_no > period_to
            {
                continue;
            }

            for line in &entry.lines {
                let slot = sums
                    .entry(line.account_code.clone())
                    .or_insert_with(|| (line.account_name.clone(), 0, 0));
                slot.1 += line.debit_minor;
                slot.2 += line.credit_minor;
            }
        }

        let total_debit_minor: i64 = sums.values().map(|(_, debit, _)| debit).sum();
        let total_credit_minor: i64 = sums.values().map(|(_, _, credit)| credit).sum();

        if total_debit_minor != total_credit_minor {
            return Err(ReportError::Integrity {
                debit: from_minor_units(total_debit_minor),
                credit: from_minor_units(total_credit_minor),
            });
        }

        let rows = sums
            .into_iter()
            .map(|(account_code, (account_name, debit, credit))| TrialBalanceRow {
                account_code,
                account_name,
                debit: from_minor_units(debit),
                credit: from_minor_units(credit),
            })
            .collect();

        Ok(TrialBalanceReport {
            fiscal_year,
            period_from,
            period_to,
            rows,
            totals: TrialBalanceTotals {
                total_debit: from_minor_units(total_debit_minor),
                total_credit: from_minor_units(total_credit_minor),
                is_balanced: true,
            },
        })
    }
}
