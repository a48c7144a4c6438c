//! Guard logic for entry state transitions.

use chrono::Utc;

use tally_shared::types::AccountCode;

use crate::fiscal::PeriodStatus;
use crate::journal::{validate_balance, EntryStatus, JournalEntry, LedgerError};

use super::types::PostingAction;

/// Stateless engine applying the balance invariant, the entry state
/// machine and period gating.
///
/// Owns no storage: the caller supplies the entry snapshot, the target
/// period's status and an account lookup, and must apply the returned
/// action atomically with any side effects (period running totals).
pub struct PostingEngine;

impl PostingEngine {
    /// Submit a draft entry for approval.
    ///
    /// Guards: entry is Draft, has at least one line, and balances
    /// exactly on the minor-unit representation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition`, `NoLines` or `UnbalancedEntry`.
    pub fn submit(entry: &JournalEntry) -> Result<PostingAction, LedgerError> {
        if entry.status != EntryStatus::Draft {
            return Err(LedgerError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Pending,
            });
        }

        validate_balance(&entry.lines)?;

        Ok(PostingAction::Submit {
            new_status: EntryStatus::Pending,
            submitted_at: Utc::now(),
        })
    }

    /// Approve (post) a pending entry.
    ///
    /// Guards, checked in order:
    /// 1. entry is Pending;
    /// 2. the entry still balances — re-validated even though pending
    ///    entries cannot be mutated, and the persisted totals must agree
    ///    with the lines;
    /// 3. the target period accepts postings;
    /// 4. every line's account still allows posting.
    ///
    /// `account_allows_posting` resolves an account code to whether it
    /// currently accepts postings, or fails with `UnknownAccount`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition`, `UnbalancedEntry`,
    /// `StoredTotalsMismatch`, `PeriodClosed` or
    /// `AccountPostingNotAllowed`.
    pub fn approve<A>(
        entry: &JournalEntry,
        period_status: PeriodStatus,
        account_allows_posting: A,
    ) -> Result<PostingAction, LedgerError>
    where
        A: Fn(&AccountCode) -> Result<bool, LedgerError>,
    {
        if entry.status != EntryStatus::Pending {
            return Err(LedgerError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Posted,
            });
        }

        let totals = validate_balance(&entry.lines)?;
        if totals != entry.totals {
            return Err(LedgerError::StoredTotalsMismatch {
                entry_no: entry.entry_no,
            });
        }

        if !period_status.allows_posting() {
            return Err(LedgerError::PeriodClosed {
                year: entry.fiscal_year,
                period: entry.period_no,
            });
        }

        for line in &entry.lines {
            if !account_allows_posting(&line.account_code)? {
                return Err(LedgerError::AccountPostingNotAllowed(
                    line.account_code.clone(),
                ));
            }
        }

        Ok(PostingAction::Approve {
            new_status: EntryStatus::Posted,
            posted_at: Utc::now(),
        })
    }

    /// Reject a pending entry.
    ///
    /// No balance or period guard: rejection is always permitted while
    /// pending, but a reason is required.
    ///
    /// # Errors
    ///
    /// Returns `ReasonRequired` or `InvalidTransition`.
    pub fn reject(entry: &JournalEntry, reason: &str) -> Result<PostingAction, LedgerError> {
        if reason.trim().is_empty() {
            return Err(LedgerError::ReasonRequired);
        }

        if entry.status != EntryStatus::Pending {
            return Err(LedgerError::InvalidTransition {
                from: entry.status,
                to: EntryStatus::Rejected,
            });
        }

        Ok(PostingAction::Reject {
            new_status: EntryStatus::Rejected,
            reason: reason.to_string(),
        })
    }

    /// Check if a status transition is part of the state machine.
    ///
    /// Valid transitions:
    /// - Draft → Pending (submit)
    /// - Pending → Posted (approve)
    /// - Pending → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: EntryStatus, to: EntryStatus) -> bool {
        matches!(
            (from, to),
            (EntryStatus::Draft, EntryStatus::Pending)
                | (
                    EntryStatus::Pending,
                    EntryStatus::Posted | EntryStatus::Rejected
                )
        )
    }
}
