//! Construction of reversing entries.
//!
//! A reversal never mutates the original entry's lines: it manufactures a
//! fresh, fully-balanced mirror entry whose lines have debit and credit
//! swapped. The mirror is pushed through the ordinary posting state
//! machine by the store layer, so it is validated like any other entry.

use chrono::NaiveDate;

use crate::journal::{EntryStatus, EntryType, JournalEntry, JournalLine, LedgerError};

/// A fully-specified reversing entry, ready for the store to number,
/// insert and post.
#[derive(Debug, Clone)]
pub struct ReversalDraft {
    /// Entry classification (always Correction).
    pub entry_type: EntryType,
    /// Date of the reversing entry.
    pub entry_date: NaiveDate,
    /// Reference carried on the reversing entry.
    pub reference: Option<String>,
    /// Description naming the reversed entry and the reason.
    pub description: String,
    /// Mirrored lines with debit and credit swapped.
    pub lines: Vec<JournalLine>,
}

/// Stateless service for building reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the mirror entry for a posted source entry.
    ///
    /// Guards: the source is Posted, not itself a reversing entry, and
    /// not already reversed; the reason is non-empty; if
    /// `reject_backdated` is set, the reversal may not be dated before
    /// the source entry.
    ///
    /// The caller is responsible for resolving the reversal date to an
    /// open period and for posting the draft atomically with marking the
    /// source as reversed.
    ///
    /// # Errors
    ///
    /// Returns `ReasonRequired`, `OnlyPostedCanBeReversed`,
    /// `CannotReverseReversal`, `AlreadyReversed` or `BackdatedReversal`.
    pub fn build(
        source: &JournalEntry,
        reversal_date: NaiveDate,
        reason: &str,
        reference: Option<String>,
        reject_backdated: bool,
    ) -> Result<ReversalDraft, LedgerError> {
        if reason.trim().is_empty() {
            return Err(LedgerError::ReasonRequired);
        }

        if source.status != EntryStatus::Posted {
            return Err(LedgerError::OnlyPostedCanBeReversed(source.status));
        }

        if source.is_reversal() {
            return Err(LedgerError::CannotReverseReversal);
        }

        if let Some(reversed_by) = source.reversed_by {
            return Err(LedgerError::AlreadyReversed {
                entry_no: source.entry_no,
                reversed_by,
            });
        }

        if reject_backdated && reversal_date < source.entry_date {
            return Err(LedgerError::BackdatedReversal {
                entry_date: source.entry_date,
                reversal_date,
            });
        }

        Ok(ReversalDraft {
            entry_type: EntryType::Correction,
            entry_date: reversal_date,
            reference,
            description: format!(
                "Reversal of entry {}/{}: {}",
                source.fiscal_year, source.entry_no, reason
            ),
            lines: Self::mirror_lines(&source.lines),
        })
    }

    /// Mirrors a set of lines by swapping debit and credit amounts.
    ///
    /// Account, denormalized name, description, analysis code and
    /// reference are preserved per line.
    #[must_use]
    pub fn mirror_lines(lines: &[JournalLine]) -> Vec<JournalLine> {
        lines
            .iter()
            .map(|line| JournalLine {
                line_no: line.line_no,
                account_code: line.account_code.clone(),
                account_name: line.account_name.clone(),
                description: line.description.clone(),
                debit_minor: line.credit_minor,
                credit_minor: line.debit_minor,
                analysis_code: line.analysis_code.clone(),
                reference: line.reference.clone(),
            })
            .collect()
    }
}
