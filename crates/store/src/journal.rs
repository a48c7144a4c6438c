//! Journal entry store.
//!
//! Owns the entries, the per-year entry number sequence and the
//! (year, number) index. Not synchronized on its own: it lives inside
//! the `GeneralLedger` state lock, which serializes number allocation
//! and every compound mutation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use tally_core::journal::{validate_can_delete, validate_can_modify};
use tally_core::{EntryStatus, EntryType, JournalEntry, JournalLine, LedgerError};
use tally_shared::types::EntryId;

/// Filter for listing journal entries.
///
/// All fields are optional; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Match entries in this status.
    pub status: Option<EntryStatus>,
    /// Match entries of this type.
    pub entry_type: Option<EntryType>,
    /// Match entries of this fiscal year.
    pub fiscal_year: Option<i32>,
    /// Match entries of this period number.
    pub period_no: Option<u8>,
    /// Match entries dated on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Match entries dated on or before this date.
    pub date_to: Option<NaiveDate>,
}

impl EntryFilter {
    /// Returns true if the entry satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.status.is_none_or(|s| entry.status == s)
            && self.entry_type.is_none_or(|t| entry.entry_type == t)
            && self.fiscal_year.is_none_or(|y| entry.fiscal_year == y)
            && self.period_no.is_none_or(|p| entry.period_no == p)
            && self.date_from.is_none_or(|d| entry.entry_date >= d)
            && self.date_to.is_none_or(|d| entry.entry_date <= d)
    }
}

/// In-memory journal entry store.
#[derive(Debug, Default)]
pub struct JournalStore {
    entries: BTreeMap<EntryId, JournalEntry>,
    by_number: BTreeMap<(i32, u32), EntryId>,
    last_no: BTreeMap<i32, u32>,
}

impl JournalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next entry number of a fiscal year.
    ///
    /// Callers hold the state write lock, so allocations are gap-free
    /// and never duplicated.
    pub fn allocate_entry_no(&mut self, fiscal_year: i32) -> u32 {
        let counter = self.last_no.entry(fiscal_year).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Inserts a new entry and indexes it by (year, number).
    pub fn insert(&mut self, entry: JournalEntry) {
        self.by_number
            .insert((entry.fiscal_year, entry.entry_no), entry.id);
        self.entries.insert(entry.id, entry);
    }

    /// Fetches an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`.
    pub fn get(&self, id: EntryId) -> Result<&JournalEntry, LedgerError> {
        self.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))
    }

    /// Fetches an entry mutably by id.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`.
    pub fn get_mut(&mut self, id: EntryId) -> Result<&mut JournalEntry, LedgerError> {
        self.entries
            .get_mut(&id)
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// Fetches an entry by (fiscal year, entry number).
    #[must_use]
    pub fn by_number(&self, fiscal_year: i32, entry_no: u32) -> Option<&JournalEntry> {
        self.by_number
            .get(&(fiscal_year, entry_no))
            .and_then(|id| self.entries.get(id))
    }

    /// Iterates over all entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.values()
    }

    /// Lists entries matching a filter, ordered by (year, entry number).
    #[must_use]
    pub fn list(&self, filter: &EntryFilter) -> Vec<&JournalEntry> {
        self.by_number
            .values()
            .filter_map(|id| self.entries.get(id))
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    /// Appends a line to a draft entry, assigning the next line number.
    /// Totals are recomputed.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `NotEditable`.
    pub fn add_line(
        &mut self,
        id: EntryId,
        mut line: JournalLine,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.get_mut(id)?;
        validate_can_modify(entry.status)?;

        line.line_no = u32::try_from(entry.lines.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        entry.lines.push(line);
        entry.recompute_totals();
        Ok(entry)
    }

    /// Replaces a line of a draft entry, keeping its line number.
    /// Totals are recomputed.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotEditable` or `LineNotFound`.
    pub fn update_line(
        &mut self,
        id: EntryId,
        line_no: u32,
        mut line: JournalLine,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.get_mut(id)?;
        validate_can_modify(entry.status)?;

        let slot = entry
            .lines
            .iter_mut()
            .find(|l| l.line_no == line_no)
            .ok_or(LedgerError::LineNotFound { line: line_no })?;
        line.line_no = line_no;
        *slot = line;
        entry.recompute_totals();
        Ok(entry)
    }

    /// Removes a line from a draft entry and renumbers the remaining
    /// lines so they stay contiguous. Totals are recomputed.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `NotEditable` or `LineNotFound`.
    pub fn remove_line(
        &mut self,
        id: EntryId,
        line_no: u32,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.get_mut(id)?;
        validate_can_modify(entry.status)?;

        let position = entry
            .lines
            .iter()
            .position(|l| l.line_no == line_no)
            .ok_or(LedgerError::LineNotFound { line: line_no })?;
        entry.lines.remove(position);
        for (index, line) in entry.lines.iter_mut().enumerate() {
            line.line_no = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        }
        entry.recompute_totals();
        Ok(entry)
    }

    /// Moves a draft entry to another fiscal year, retiring its old
    /// (year, number) slot and allocating a fresh number in the new
    /// year. Used when a draft is re-dated across a year boundary.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `NotEditable`.
    pub fn renumber_for_year(
        &mut self,
        id: EntryId,
        fiscal_year: i32,
    ) -> Result<u32, LedgerError> {
        let entry = self.get(id)?;
        validate_can_modify(entry.status)?;
        let old_key = (entry.fiscal_year, entry.entry_no);

        let entry_no = self.allocate_entry_no(fiscal_year);
        self.by_number.remove(&old_key);
        self.by_number.insert((fiscal_year, entry_no), id);
        let entry = self.get_mut(id)?;
        entry.fiscal_year = fiscal_year;
        entry.entry_no = entry_no;
        Ok(entry_no)
    }

    /// Deletes a draft entry. The (year, number) slot is retired, not
    /// reused: the audit trail keeps numbering append-only.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `CanOnlyDeleteDraft`.
    pub fn delete(&mut self, id: EntryId) -> Result<JournalEntry, LedgerError> {
        let entry = self.get(id)?;
        validate_can_delete(entry.status)?;

        let key = (entry.fiscal_year, entry.entry_no);
        self.by_number.remove(&key);
        self.entries
            .remove(&id)
            .ok_or(LedgerError::EntryNotFound(id))
    }
}
