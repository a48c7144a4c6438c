//! Property-based tests for the posting state machine.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;

use tally_shared::types::{AccountCode, EntryId};

use crate::fiscal::PeriodStatus;
use crate::journal::{EntryStatus, EntryTotals, EntryType, JournalEntry, JournalLine, LedgerError};

use super::engine::PostingEngine;

fn status_strategy() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![
        Just(EntryStatus::Draft),
        Just(EntryStatus::Pending),
        Just(EntryStatus::Posted),
        Just(EntryStatus::Rejected),
    ]
}

fn period_status_strategy() -> impl Strategy<Value = PeriodStatus> {
    prop_oneof![
        Just(PeriodStatus::Future),
        Just(PeriodStatus::Open),
        Just(PeriodStatus::Closed),
        Just(PeriodStatus::Locked),
        Just(PeriodStatus::Archived),
    ]
}

fn balanced_entry(status: EntryStatus, amount_minor: i64) -> JournalEntry {
    let lines = vec![
        JournalLine {
            line_no: 1,
            account_code: AccountCode::new("1000"),
            account_name: "Cash".to_string(),
            description: None,
            debit_minor: amount_minor,
            credit_minor: 0,
            analysis_code: None,
            reference: None,
        },
        JournalLine {
            line_no: 2,
            account_code: AccountCode::new("4000"),
            account_name: "Revenue".to_string(),
            description: None,
            debit_minor: 0,
            credit_minor: amount_minor,
            analysis_code: None,
            reference: None,
        },
    ];
    let mut entry = JournalEntry {
        id: EntryId::new(),
        entry_no: 1,
        fiscal_year: 2026,
        period_no: 1,
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        entry_type: EntryType::General,
        reference: None,
        description: "prop entry".to_string(),
        notes: None,
        status,
        lines,
        totals: EntryTotals::default(),
        reversed_by: None,
        reverses: None,
        rejection_reason: None,
        created_at: Utc::now(),
        submitted_at: None,
        posted_at: None,
    };
    entry.recompute_totals();
    entry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Submit succeeds exactly from Draft for a balanced entry.
    #[test]
    fn submit_only_from_draft(
        status in status_strategy(),
        amount in 1_i64..=10_000_000,
    ) {
        let entry = balanced_entry(status, amount);
        let result = PostingEngine::submit(&entry);
        prop_assert_eq!(result.is_ok(), status == EntryStatus::Draft);
    }

    /// Approval of a balanced pending entry succeeds exactly when the
    /// period is open; a non-open period always yields the period gate
    /// error, never a different one.
    #[test]
    fn approve_gated_by_period(
        period_status in period_status_strategy(),
        amount in 1_i64..=10_000_000,
    ) {
        let entry = balanced_entry(EntryStatus::Pending, amount);
        let result = PostingEngine::approve(&entry, period_status, |_| Ok(true));
        if period_status == PeriodStatus::Open {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(
                matches!(result, Err(LedgerError::PeriodClosed { .. })),
                "expected PeriodClosed error"
            );
        }
    }

    /// From terminal statuses, every transition attempt fails and the
    /// failure is deterministic (`InvalidTransition`).
    #[test]
    fn terminal_statuses_stay_terminal(amount in 1_i64..=10_000_000) {
        for status in [EntryStatus::Posted, EntryStatus::Rejected] {
            let entry = balanced_entry(status, amount);
            prop_assert!(
                matches!(
                    PostingEngine::submit(&entry),
                    Err(LedgerError::InvalidTransition { .. })
                ),
                "expected InvalidTransition error from submit"
            );
            prop_assert!(
                matches!(
                    PostingEngine::approve(&entry, PeriodStatus::Open, |_| Ok(true)),
                    Err(LedgerError::InvalidTransition { .. })
                ),
                "expected InvalidTransition error from approve"
            );
            prop_assert!(
                matches!(
                    PostingEngine::reject(&entry, "reason"),
                    Err(LedgerError::InvalidTransition { .. })
                ),
                "expected InvalidTransition error from reject"
            );
        }
    }
}
