//! Property-based tests for reversal construction.

use proptest::prelude::*;
use std::collections::BTreeMap;

use tally_shared::types::AccountCode;

use crate::journal::{EntryTotals, JournalLine};

use super::service::ReversalService;

fn lines_strategy() -> impl Strategy<Value = Vec<JournalLine>> {
    prop::collection::vec((1_u16..100, 1_i64..=1_000_000_000, prop::bool::ANY), 1..20).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(idx, (account, amount, is_debit))| JournalLine {
                    line_no: u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1),
                    account_code: AccountCode::new(format!("{}", 1000 + account)),
                    account_name: format!("Account {account}"),
                    description: None,
                    debit_minor: if is_debit { amount } else { 0 },
                    credit_minor: if is_debit { 0 } else { amount },
                    analysis_code: None,
                    reference: None,
                })
                .collect()
        },
    )
}

fn net_by_account(lines: &[JournalLine]) -> BTreeMap<AccountCode, i64> {
    let mut nets = BTreeMap::new();
    for line in lines {
        *nets.entry(line.account_code.clone()).or_insert(0) += line.debit_minor - line.credit_minor;
    }
    nets
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A mirror swaps the totals of any line set.
    #[test]
    fn mirror_swaps_totals(lines in lines_strategy()) {
        let original = EntryTotals::from_lines(&lines);
        let mirrored = EntryTotals::from_lines(&ReversalService::mirror_lines(&lines));
        prop_assert_eq!(original.debit_minor, mirrored.credit_minor);
        prop_assert_eq!(original.credit_minor, mirrored.debit_minor);
    }

    /// The mirror of a balanced line set is itself balanced.
    #[test]
    fn mirror_of_balanced_is_balanced(lines in lines_strategy()) {
        let mirrored = ReversalService::mirror_lines(&lines);
        let original = EntryTotals::from_lines(&lines);
        let mirrored_totals = EntryTotals::from_lines(&mirrored);
        prop_assert_eq!(
            original.is_balanced(),
            mirrored_totals.is_balanced()
        );
    }

    /// Original plus mirror nets to zero for every touched account.
    #[test]
    fn original_plus_mirror_nets_to_zero(lines in lines_strategy()) {
        let mirrored = ReversalService::mirror_lines(&lines);
        let mut combined = lines.clone();
        combined.extend(mirrored);
        for (account, net) in net_by_account(&combined) {
            prop_assert_eq!(net, 0, "account {} does not net to zero", account);
        }
    }

    /// Mirroring twice restores the original amounts.
    #[test]
    fn mirror_is_an_involution(lines in lines_strategy()) {
        let twice = ReversalService::mirror_lines(&ReversalService::mirror_lines(&lines));
        for (a, b) in lines.iter().zip(twice.iter()) {
            prop_assert_eq!(a.debit_minor, b.debit_minor);
            prop_assert_eq!(a.credit_minor, b.credit_minor);
        }
    }
}
