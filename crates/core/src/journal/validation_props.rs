//! Property-based tests for balance validation.

use proptest::prelude::*;

use tally_shared::types::AccountCode;

use super::error::LedgerError;
use super::types::JournalLine;
use super::validation::validate_balance;

fn line(no: u32, debit_minor: i64, credit_minor: i64) -> JournalLine {
    JournalLine {
        line_no: no,
        account_code: AccountCode::new(format!("{}", 1000 + no)),
        account_name: format!("Account {no}"),
        description: None,
        debit_minor,
        credit_minor,
        analysis_code: None,
        reference: None,
    }
}

/// Strategy for a vector of positive minor-unit amounts.
fn amounts_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1_i64..=1_000_000_000, 1..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Splitting any set of amounts into a debit line and a credit line
    /// per amount always balances.
    #[test]
    fn mirrored_lines_always_balance(amounts in amounts_strategy()) {
        let mut lines = Vec::new();
        let mut no = 0;
        for amount in &amounts {
            no += 1;
            lines.push(line(no, *amount, 0));
            no += 1;
            lines.push(line(no, 0, *amount));
        }

        prop_assert!(validate_balance(&lines).is_ok());
    }

    /// Perturbing one side of a balanced set by any nonzero delta breaks
    /// the balance exactly.
    #[test]
    fn perturbed_lines_never_balance(
        amounts in amounts_strategy(),
        delta in prop_oneof![-1_000_000_i64..=-1, 1_i64..=1_000_000],
    ) {
        let mut lines = Vec::new();
        let mut no = 0;
        for amount in &amounts {
            no += 1;
            lines.push(line(no, *amount, 0));
            no += 1;
            lines.push(line(no, 0, *amount));
        }
        // Push the perturbation as an extra single-sided line.
        no += 1;
        if delta > 0 {
            lines.push(line(no, delta, 0));
        } else {
            lines.push(line(no, 0, -delta));
        }

        prop_assert!(
            matches!(
                validate_balance(&lines),
                Err(LedgerError::UnbalancedEntry { .. })
            ),
            "expected UnbalancedEntry error"
        );
    }

    /// The computed totals equal the integer sums of the line amounts.
    #[test]
    fn totals_are_exact_sums(amounts in amounts_strategy()) {
        let mut lines = Vec::new();
        let mut no = 0;
        for amount in &amounts {
            no += 1;
            lines.push(line(no, *amount, 0));
            no += 1;
            lines.push(line(no, 0, *amount));
        }

        let totals = validate_balance(&lines).unwrap();
        let expected: i64 = amounts.iter().sum();
        prop_assert_eq!(totals.debit_minor, expected);
        prop_assert_eq!(totals.credit_minor, expected);
    }
}
