//! The general ledger service facade.
//!
//! Every operation runs under a single `RwLock` over the combined
//! journal-and-periods state, so compound guards (check period, check
//! accounts, then post and bump totals) execute as one critical section
//! and check-then-act races cannot occur. Reads clone a snapshot and
//! release the lock before returning.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::{error, info};

use tally_core::fiscal::ADJUSTMENT_PERIOD_NO;
use tally_core::journal::{validate_can_modify, validate_line};
use tally_core::{
    EntryStatus, EntryType, HeaderPatch, JournalEntry, JournalLine, LedgerError, LineInput,
    Period, PeriodError, PostingAction, PostingEngine, ReportError, ReportService,
    ReversalService, TrialBalanceReport,
};
use tally_shared::types::{AccountCode, EntryId, PeriodId};
use tally_shared::LedgerConfig;

use crate::accounts::AccountDirectory;
use crate::journal::{EntryFilter, JournalStore};
use crate::periods::PeriodRegister;

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Date of the entry; resolves the target period unless `period`
    /// is given.
    pub entry_date: NaiveDate,
    /// Entry classification.
    pub entry_type: EntryType,
    /// Free-text reference.
    pub reference: Option<String>,
    /// Entry description.
    pub description: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Explicit (fiscal year, period number) target, used to address the
    /// period-13 adjustment window, which is never resolved by date.
    pub period: Option<(i32, u8)>,
}

struct LedgerState {
    journal: JournalStore,
    periods: PeriodRegister,
}

/// The ledger: journal store and period register behind one lock, with
/// the account directory injected at the seam.
pub struct GeneralLedger {
    state: RwLock<LedgerState>,
    accounts: Arc<dyn AccountDirectory>,
    config: LedgerConfig,
}

impl GeneralLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountDirectory>, config: LedgerConfig) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                journal: JournalStore::new(),
                periods: PeriodRegister::new(),
            }),
            accounts,
            config,
        }
    }

    // ========== Journal entries ==========

    /// Creates a draft entry with no lines, allocating the next entry
    /// number of its fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `NoPeriodForDate` or, for an explicit period target,
    /// `PeriodNotFound`.
    pub fn create_entry(&self, input: NewEntry) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let (fiscal_year, period_no) = match input.period {
            Some((year, period)) => {
                state
                    .periods
                    .get(year, period)
                    .ok_or(LedgerError::PeriodNotFound { year, period })?;
                (year, period)
            }
            None => {
                let period = state
                    .periods
                    .find_for_date(input.entry_date)
                    .ok_or(LedgerError::NoPeriodForDate(input.entry_date))?;
                (period.fiscal_year, period.period_no)
            }
        };

        let entry_no = state.journal.allocate_entry_no(fiscal_year);
        let entry = JournalEntry {
            id: EntryId::new(),
            entry_no,
            fiscal_year,
            period_no,
            entry_date: input.entry_date,
            entry_type: input.entry_type,
            reference: input.reference,
            description: input.description,
            notes: input.notes,
            status: EntryStatus::Draft,
            lines: vec![],
            totals: tally_core::EntryTotals::default(),
            reversed_by: None,
            reverses: None,
            rejection_reason: None,
            created_at: Utc::now(),
            submitted_at: None,
            posted_at: None,
        };
        let snapshot = entry.clone();
        state.journal.insert(entry);

        info!(
            entry_no,
            fiscal_year,
            period_no,
            entry_type = %snapshot.entry_type,
            "journal entry created"
        );
        Ok(snapshot)
    }

    /// Appends a line to a draft entry.
    ///
    /// The account must exist and allow posting; its name is captured
    /// onto the line. Amounts are validated and converted to minor
    /// units; totals are recomputed.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotEditable`, line validation errors,
    /// `UnknownAccount` or `AccountPostingNotAllowed`.
    pub fn add_line(&self, id: EntryId, input: LineInput) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let entry = state.journal.get(id)?;
        validate_can_modify(entry.status)?;
        let line_no = u32::try_from(entry.lines.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);

        let line = self.build_line(line_no, &input)?;
        Ok(state.journal.add_line(id, line)?.clone())
    }

    /// Replaces a line of a draft entry.
    ///
    /// # Errors
    ///
    /// As `add_line`, plus `LineNotFound`.
    pub fn update_line(
        &self,
        id: EntryId,
        line_no: u32,
        input: LineInput,
    ) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let line = self.build_line(line_no, &input)?;
        Ok(state.journal.update_line(id, line_no, line)?.clone())
    }

    /// Removes a line from a draft entry; remaining lines are
    /// renumbered contiguously.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotEditable` or `LineNotFound`.
    pub fn remove_line(&self, id: EntryId, line_no: u32) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        Ok(state.journal.remove_line(id, line_no)?.clone())
    }

    /// Updates a draft entry's header fields.
    ///
    /// A new entry date re-resolves the target period, except for
    /// adjustment-window entries, which keep period 13. Re-dating
    /// across a year boundary reallocates the entry number in the new
    /// fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotEditable` or `NoPeriodForDate`.
    pub fn update_header(
        &self,
        id: EntryId,
        patch: HeaderPatch,
    ) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let entry = state.journal.get(id)?;
        validate_can_modify(entry.status)?;

        let new_key = match patch.entry_date {
            Some(date) if entry.period_no != ADJUSTMENT_PERIOD_NO => {
                let period = state
                    .periods
                    .find_for_date(date)
                    .ok_or(LedgerError::NoPeriodForDate(date))?;
                Some((period.fiscal_year, period.period_no))
            }
            _ => None,
        };
        if let Some((year, _)) = new_key {
            if year != entry.fiscal_year {
                state.journal.renumber_for_year(id, year)?;
            }
        }

        let entry = state.journal.get_mut(id)?;
        if let Some(date) = patch.entry_date {
            entry.entry_date = date;
        }
        if let Some((_, period_no)) = new_key {
            entry.period_no = period_no;
        }
        if let Some(entry_type) = patch.entry_type {
            entry.entry_type = entry_type;
        }
        if let Some(reference) = patch.reference {
            entry.reference = reference;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        Ok(entry.clone())
    }

    /// Deletes a draft entry; its number is retired, never reused.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `CanOnlyDeleteDraft`.
    pub fn delete_entry(&self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let removed = self.state.write().journal.delete(id)?;
        info!(
            entry_no = removed.entry_no,
            fiscal_year = removed.fiscal_year,
            "draft entry deleted"
        );
        Ok(removed)
    }

    /// Fetches a snapshot of an entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`.
    pub fn get_entry(&self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        Ok(self.state.read().journal.get(id)?.clone())
    }

    /// Lists entry snapshots matching a filter, ordered by
    /// (year, entry number).
    #[must_use]
    pub fn list_entries(&self, filter: &EntryFilter) -> Vec<JournalEntry> {
        self.state
            .read()
            .journal
            .list(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    // ========== Posting workflow ==========

    /// Submits a draft entry for approval (Draft → Pending).
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidTransition`, `NoLines` or
    /// `UnbalancedEntry`.
    pub fn submit(&self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let action = PostingEngine::submit(state.journal.get(id)?)?;
        let entry = state.journal.get_mut(id)?;
        apply_action(entry, action);

        info!(
            entry_no = entry.entry_no,
            fiscal_year = entry.fiscal_year,
            status = %entry.status,
            "entry submitted"
        );
        Ok(entry.clone())
    }

    /// Approves a pending entry (Pending → Posted).
    ///
    /// The period's running totals are incremented in the same critical
    /// section; afterwards the entry is immutable.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidTransition`, balance errors,
    /// `PeriodClosed`, `UnknownAccount` or `AccountPostingNotAllowed`.
    pub fn approve(&self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let entry = state.journal.get(id)?;
        let period_status = state
            .periods
            .get(entry.fiscal_year, entry.period_no)
            .ok_or(LedgerError::PeriodNotFound {
                year: entry.fiscal_year,
                period: entry.period_no,
            })?
            .status;
        let action = PostingEngine::approve(entry, period_status, |code| {
            self.account_allows_posting(code)
        })?;
        let period_key = (entry.fiscal_year, entry.period_no);

        let entry = state.journal.get_mut(id)?;
        apply_action(entry, action);
        let snapshot = entry.clone();
        state.periods.record_posting(
            period_key.0,
            period_key.1,
            snapshot.totals.debit_minor,
            snapshot.totals.credit_minor,
        );

        info!(
            entry_no = snapshot.entry_no,
            fiscal_year = snapshot.fiscal_year,
            period_no = snapshot.period_no,
            debit_minor = snapshot.totals.debit_minor,
            "entry posted"
        );
        Ok(snapshot)
    }

    /// Rejects a pending entry (Pending → Rejected). Terminal.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `ReasonRequired` or `InvalidTransition`.
    pub fn reject(&self, id: EntryId, reason: &str) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let action = PostingEngine::reject(state.journal.get(id)?, reason)?;
        let entry = state.journal.get_mut(id)?;
        apply_action(entry, action);

        info!(
            entry_no = entry.entry_no,
            fiscal_year = entry.fiscal_year,
            "entry rejected"
        );
        Ok(entry.clone())
    }

    // ========== Reversal ==========

    /// Reverses a posted entry by creating and posting a mirror entry
    /// of type Correction, then marking the source as reversed. The
    /// whole compound operation is all-or-nothing under one write lock.
    ///
    /// The reversal date resolves the target period, which must be Open.
    /// The mirror goes through the ordinary submit and approve guards,
    /// not a special path.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, reversal guard errors
    /// (`OnlyPostedCanBeReversed`, `AlreadyReversed`,
    /// `CannotReverseReversal`, `ReasonRequired`, `BackdatedReversal`),
    /// `NoPeriodForDate`, `PeriodClosed`, `UnknownAccount` or
    /// `AccountPostingNotAllowed`.
    pub fn reverse(
        &self,
        id: EntryId,
        reversal_date: NaiveDate,
        reason: &str,
        reference: Option<String>,
    ) -> Result<JournalEntry, LedgerError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let source = state.journal.get(id)?.clone();
        let draft = ReversalService::build(
            &source,
            reversal_date,
            reason,
            reference,
            self.config.reject_backdated_reversals,
        )?;

        let target = state
            .periods
            .find_for_date(reversal_date)
            .ok_or(LedgerError::NoPeriodForDate(reversal_date))?;
        let (target_year, target_period, target_status) =
            (target.fiscal_year, target.period_no, target.status);
        if !target_status.allows_posting() {
            return Err(LedgerError::PeriodClosed {
                year: target_year,
                period: target_period,
            });
        }

        // The mirror is built fully off to the side and walked through
        // submit + approve before anything is stored, so a guard failure
        // leaves the ledger untouched.
        let entry_no = state.journal.allocate_entry_no(target_year);
        let mut reversing = JournalEntry {
            id: EntryId::new(),
            entry_no,
            fiscal_year: target_year,
            period_no: target_period,
            entry_date: draft.entry_date,
            entry_type: draft.entry_type,
            reference: draft.reference,
            description: draft.description,
            notes: None,
            status: EntryStatus::Draft,
            lines: draft.lines,
            totals: tally_core::EntryTotals::default(),
            reversed_by: None,
            reverses: Some(source.id),
            rejection_reason: None,
            created_at: Utc::now(),
            submitted_at: None,
            posted_at: None,
        };
        reversing.recompute_totals();

        let action = PostingEngine::submit(&reversing)?;
        apply_action(&mut reversing, action);
        let action = PostingEngine::approve(&reversing, target_status, |code| {
            self.account_allows_posting(code)
        })?;
        apply_action(&mut reversing, action);

        let snapshot = reversing.clone();
        state.journal.insert(reversing);
        state.periods.record_posting(
            target_year,
            target_period,
            snapshot.totals.debit_minor,
            snapshot.totals.credit_minor,
        );
        state.journal.get_mut(id)?.reversed_by = Some(entry_no);

        info!(
            source_entry_no = source.entry_no,
            source_fiscal_year = source.fiscal_year,
            entry_no,
            fiscal_year = target_year,
            period_no = target_period,
            "entry reversed"
        );
        Ok(snapshot)
    }

    // ========== Reporting ==========

    /// Generates a trial balance over a period range of one fiscal year
    /// from a read-lock snapshot of the posted entries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriodRange` or `Integrity`; the latter is also
    /// logged, because it signals a defect upstream of the report.
    pub fn trial_balance(
        &self,
        fiscal_year: i32,
        period_from: u8,
        period_to: u8,
    ) -> Result<TrialBalanceReport, ReportError> {
        let entries: Vec<JournalEntry> = {
            let state = self.state.read();
            state.journal.iter().cloned().collect()
        };

        ReportService::trial_balance(&entries, fiscal_year, period_from, period_to).inspect_err(
            |err| {
                if let ReportError::Integrity { debit, credit } = err {
                    error!(fiscal_year, %debit, %credit, "trial balance integrity violation");
                }
            },
        )
    }

    // ========== Periods ==========

    /// Generates the periods of a fiscal year (12 monthly + adjustment
    /// window), all Future.
    ///
    /// # Errors
    ///
    /// Returns `YearAlreadyExists` or `YearOutOfRange`.
    pub fn create_year(&self, year: i32) -> Result<Vec<Period>, PeriodError> {
        let periods = self.state.write().periods.create_year(year)?;
        info!(fiscal_year = year, "fiscal year periods created");
        Ok(periods)
    }

    /// Opens a period; see `PeriodRegister::open` for the sequencing
    /// rules.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition` or
    /// `OutOfSequenceOpen`.
    pub fn open_period(&self, id: PeriodId) -> Result<Period, PeriodError> {
        let period = self.state.write().periods.open(id)?;
        info!(
            fiscal_year = period.fiscal_year,
            period_no = period.period_no,
            status = %period.status,
            "period opened"
        );
        Ok(period)
    }

    /// Closes the current period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `NotCurrentPeriod` or
    /// `InvalidTransition`.
    pub fn close_period(&self, id: PeriodId) -> Result<Period, PeriodError> {
        let period = self.state.write().periods.close(id)?;
        info!(
            fiscal_year = period.fiscal_year,
            period_no = period.period_no,
            status = %period.status,
            "period closed"
        );
        Ok(period)
    }

    /// Reopens a closed period for corrections.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition` or
    /// `LaterPeriodOpen`.
    pub fn reopen_period(&self, id: PeriodId) -> Result<Period, PeriodError> {
        let period = self.state.write().periods.reopen(id)?;
        info!(
            fiscal_year = period.fiscal_year,
            period_no = period.period_no,
            status = %period.status,
            "period reopened"
        );
        Ok(period)
    }

    /// Locks a closed period once the configured grace window has
    /// elapsed. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition` or
    /// `LockGraceNotElapsed`.
    pub fn lock_period(&self, id: PeriodId) -> Result<Period, PeriodError> {
        let period = self
            .state
            .write()
            .periods
            .lock(id, self.config.lock_grace_days)?;
        info!(
            fiscal_year = period.fiscal_year,
            period_no = period.period_no,
            status = %period.status,
            "period locked"
        );
        Ok(period)
    }

    /// Archives a locked period of a prior fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition`, `NoCurrentPeriod`
    /// or `ArchiveRequiresPriorYear`.
    pub fn archive_period(&self, id: PeriodId) -> Result<Period, PeriodError> {
        let period = self.state.write().periods.archive(id)?;
        info!(
            fiscal_year = period.fiscal_year,
            period_no = period.period_no,
            status = %period.status,
            "period archived"
        );
        Ok(period)
    }

    /// The current period, if one has been opened.
    #[must_use]
    pub fn current_period(&self) -> Option<Period> {
        self.state.read().periods.current().cloned()
    }

    /// The regular period covering a date.
    #[must_use]
    pub fn find_period_for_date(&self, date: NaiveDate) -> Option<Period> {
        self.state.read().periods.find_for_date(date).cloned()
    }

    /// The periods of a fiscal year in period order.
    #[must_use]
    pub fn list_periods(&self, year: i32) -> Vec<Period> {
        self.state
            .read()
            .periods
            .list_year(year)
            .into_iter()
            .cloned()
            .collect()
    }

    // ========== Internal ==========

    fn build_line(&self, line_no: u32, input: &LineInput) -> Result<JournalLine, LedgerError> {
        let amounts = validate_line(line_no, input)?;
        let record = self
            .accounts
            .lookup(&input.account_code)
            .ok_or_else(|| LedgerError::UnknownAccount(input.account_code.clone()))?;
        if !record.allows_posting {
            return Err(LedgerError::AccountPostingNotAllowed(
                input.account_code.clone(),
            ));
        }

        Ok(JournalLine {
            line_no,
            account_code: input.account_code.clone(),
            account_name: record.name,
            description: input.description.clone(),
            debit_minor: amounts.debit_minor,
            credit_minor: amounts.credit_minor,
            analysis_code: input.analysis_code.clone(),
            reference: input.reference.clone(),
        })
    }

    fn account_allows_posting(&self, code: &AccountCode) -> Result<bool, LedgerError> {
        self.accounts
            .lookup(code)
            .map(|record| record.allows_posting)
            .ok_or_else(|| LedgerError::UnknownAccount(code.clone()))
    }
}

/// Applies a validated posting action to an entry, recording the audit
/// timestamps the action carries.
fn apply_action(entry: &mut JournalEntry, action: PostingAction) {
    match action {
        PostingAction::Submit {
            new_status,
            submitted_at,
        } => {
            entry.status = new_status;
            entry.submitted_at = Some(submitted_at);
        }
        PostingAction::Approve {
            new_status,
            posted_at,
        } => {
            entry.status = new_status;
            entry.posted_at = Some(posted_at);
        }
        PostingAction::Reject { new_status, reason } => {
            entry.status = new_status;
            entry.rejection_reason = Some(reason);
        }
    }
}
