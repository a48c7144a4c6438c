//! Fiscal period register.
//!
//! Tracks every period of every generated fiscal year, the single
//! current period, and the running posted totals. Lifecycle edges are
//! validated by `tally_core::fiscal`; this module adds the register
//! guards that need neighboring state: open sequencing, reopen gating,
//! the lock grace window and year-rollover archiving.
//!
//! Like `JournalStore`, the register is unsynchronized on its own and
//! lives inside the `GeneralLedger` state lock.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use tally_core::fiscal::{generate_year_periods, validate_status_transition};
use tally_core::{Period, PeriodError, PeriodStatus, PeriodType};
use tally_shared::types::PeriodId;

/// In-memory register of fiscal periods.
#[derive(Debug, Default)]
pub struct PeriodRegister {
    periods: BTreeMap<(i32, u8), Period>,
    by_id: BTreeMap<PeriodId, (i32, u8)>,
    current: Option<(i32, u8)>,
}

impl PeriodRegister {
    /// Creates an empty register.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(&self, id: PeriodId) -> Result<(i32, u8), PeriodError> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or(PeriodError::PeriodNotFound(id))
    }

    /// Generates the periods of a fiscal year: twelve monthly periods
    /// plus the period-13 adjustment window, all starting out Future.
    ///
    /// # Errors
    ///
    /// Returns `YearAlreadyExists` or `YearOutOfRange`.
    pub fn create_year(&mut self, year: i32) -> Result<Vec<Period>, PeriodError> {
        if self
            .periods
            .range((year, 0)..=(year, u8::MAX))
            .next()
            .is_some()
        {
            return Err(PeriodError::YearAlreadyExists(year));
        }

        let periods = generate_year_periods(year).ok_or(PeriodError::YearOutOfRange(year))?;
        for period in &periods {
            self.by_id.insert(period.id, (year, period.period_no));
            self.periods
                .insert((year, period.period_no), period.clone());
        }
        Ok(periods)
    }

    /// Fetches a period by id.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`.
    pub fn get_by_id(&self, id: PeriodId) -> Result<&Period, PeriodError> {
        let key = self.key_of(id)?;
        self.periods
            .get(&key)
            .ok_or(PeriodError::PeriodNotFound(id))
    }

    /// Fetches a period by (fiscal year, period number).
    #[must_use]
    pub fn get(&self, fiscal_year: i32, period_no: u8) -> Option<&Period> {
        self.periods.get(&(fiscal_year, period_no))
    }

    /// The current period, if one has been opened.
    #[must_use]
    pub fn current(&self) -> Option<&Period> {
        self.current.and_then(|key| self.periods.get(&key))
    }

    /// Lists the periods of a fiscal year in period order.
    #[must_use]
    pub fn list_year(&self, year: i32) -> Vec<&Period> {
        self.periods
            .range((year, 0)..=(year, u8::MAX))
            .map(|(_, period)| period)
            .collect()
    }

    /// Finds the regular period covering a date. The adjustment window
    /// shares December 31 with period 12 and is only addressed
    /// explicitly, never by date.
    #[must_use]
    pub fn find_for_date(&self, date: NaiveDate) -> Option<&Period> {
        self.periods.values().find(|period| {
            period.period_type == PeriodType::Regular && period.contains_date(date)
        })
    }

    /// Opens a Future period.
    ///
    /// The period must immediately follow the current period in calendar
    /// sequence (the first open of a fresh ledger is exempt). A still-open
    /// current period is closed in the same step, so exactly one period
    /// is current afterwards.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition` or
    /// `OutOfSequenceOpen`.
    pub fn open(&mut self, id: PeriodId) -> Result<Period, PeriodError> {
        let key = self.key_of(id)?;
        let status = self.status_of(key);
        if status != PeriodStatus::Future {
            return Err(PeriodError::InvalidTransition {
                from: status,
                to: PeriodStatus::Open,
            });
        }

        if let Some(current_key) = self.current {
            if !follows(current_key, key) {
                return Err(PeriodError::OutOfSequenceOpen {
                    year: key.0,
                    period: key.1,
                });
            }
            self.retire_current(current_key);
        }

        let period = self
            .periods
            .get_mut(&key)
            .ok_or(PeriodError::PeriodNotFound(id))?;
        period.status = PeriodStatus::Open;
        period.is_current = true;
        self.current = Some(key);
        Ok(period.clone())
    }

    /// Closes the current period and stamps `closed_at` for the lock
    /// grace window. The period remains current until a successor opens.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `NotCurrentPeriod` or
    /// `InvalidTransition`.
    pub fn close(&mut self, id: PeriodId) -> Result<Period, PeriodError> {
        let key = self.key_of(id)?;
        if self.current != Some(key) {
            return Err(PeriodError::NotCurrentPeriod {
                year: key.0,
                period: key.1,
            });
        }
        validate_status_transition(self.status_of(key), PeriodStatus::Closed)?;

        let period = self
            .periods
            .get_mut(&key)
            .ok_or(PeriodError::PeriodNotFound(id))?;
        period.status = PeriodStatus::Closed;
        period.closed_at = Some(Utc::now());
        Ok(period.clone())
    }

    /// Reopens a Closed period for correcting postings.
    ///
    /// Refused while any later period is Open: reopening under a live
    /// successor would put two periods in posting state at once. A
    /// Locked period fails the transition check; locking is final.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition` or
    /// `LaterPeriodOpen`.
    pub fn reopen(&mut self, id: PeriodId) -> Result<Period, PeriodError> {
        let key = self.key_of(id)?;
        validate_status_transition(self.status_of(key), PeriodStatus::Open)?;

        if let Some((later_year, later_no)) = self
            .periods
            .range((key.0, key.1 + 1)..)
            .find(|(_, period)| period.status == PeriodStatus::Open)
            .map(|(later_key, _)| *later_key)
        {
            return Err(PeriodError::LaterPeriodOpen {
                year: later_year,
                period: later_no,
            });
        }

        if let Some(current_key) = self.current {
            self.retire_current(current_key);
        }

        let period = self
            .periods
            .get_mut(&key)
            .ok_or(PeriodError::PeriodNotFound(id))?;
        period.status = PeriodStatus::Open;
        period.is_current = true;
        period.closed_at = None;
        self.current = Some(key);
        Ok(period.clone())
    }

    /// Locks a Closed period once the grace window since `closed_at` has
    /// elapsed. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition` or
    /// `LockGraceNotElapsed`.
    pub fn lock(&mut self, id: PeriodId, grace_days: i64) -> Result<Period, PeriodError> {
        let key = self.key_of(id)?;
        validate_status_transition(self.status_of(key), PeriodStatus::Locked)?;

        let period = self
            .periods
            .get_mut(&key)
            .ok_or(PeriodError::PeriodNotFound(id))?;
        let elapsed = period
            .closed_at
            .map_or(0, |closed_at| (Utc::now() - closed_at).num_days());
        if elapsed < grace_days {
            return Err(PeriodError::LockGraceNotElapsed {
                days_remaining: grace_days - elapsed,
            });
        }

        period.status = PeriodStatus::Locked;
        Ok(period.clone())
    }

    /// Archives a Locked period of a fiscal year strictly before the
    /// current period's year.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `InvalidTransition`, `NoCurrentPeriod`
    /// or `ArchiveRequiresPriorYear`.
    pub fn archive(&mut self, id: PeriodId) -> Result<Period, PeriodError> {
        let key = self.key_of(id)?;
        validate_status_transition(self.status_of(key), PeriodStatus::Archived)?;

        let current_year = self
            .current
            .map(|(year, _)| year)
            .ok_or(PeriodError::NoCurrentPeriod)?;
        if key.0 >= current_year {
            return Err(PeriodError::ArchiveRequiresPriorYear { year: key.0 });
        }

        let period = self
            .periods
            .get_mut(&key)
            .ok_or(PeriodError::PeriodNotFound(id))?;
        period.status = PeriodStatus::Archived;
        Ok(period.clone())
    }

    /// Adds a posting's amounts to a period's running totals.
    ///
    /// Callers invoke this in the same critical section that posts the
    /// entry; a missing period here would mean the posting guards were
    /// bypassed, so the increment is silently skipped rather than
    /// panicking.
    pub fn record_posting(
        &mut self,
        fiscal_year: i32,
        period_no: u8,
        debit_minor: i64,
        credit_minor: i64,
    ) {
        if let Some(period) = self.periods.get_mut(&(fiscal_year, period_no)) {
            period.posted_debit_minor += debit_minor;
            period.posted_credit_minor += credit_minor;
        }
    }

    fn status_of(&self, key: (i32, u8)) -> PeriodStatus {
        self.periods
            .get(&key)
            .map_or(PeriodStatus::Future, |period| period.status)
    }

    fn retire_current(&mut self, current_key: (i32, u8)) {
        if let Some(previous) = self.periods.get_mut(&current_key) {
            if previous.status == PeriodStatus::Open {
                previous.status = PeriodStatus::Closed;
                previous.closed_at = Some(Utc::now());
            }
            previous.is_current = false;
        }
        self.current = None;
    }
}

/// True if `next` immediately follows `current` in calendar sequence.
/// January of the next year follows both December and the adjustment
/// window of the prior year.
fn follows(current: (i32, u8), next: (i32, u8)) -> bool {
    (next.0 == current.0 && next.1 == current.1 + 1)
        || (next.0 == current.0 + 1 && next.1 == 1 && current.1 >= 12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn register_with_year(year: i32) -> (PeriodRegister, Vec<Period>) {
        let mut register = PeriodRegister::new();
        let periods = register.create_year(year).unwrap();
        (register, periods)
    }

    #[test]
    fn test_create_year_once() {
        let (mut register, periods) = register_with_year(2026);
        assert_eq!(periods.len(), 13);
        assert!(matches!(
            register.create_year(2026),
            Err(PeriodError::YearAlreadyExists(2026))
        ));
    }

    #[test]
    fn test_first_open_is_exempt_from_sequencing() {
        let (mut register, periods) = register_with_year(2026);
        // Nothing is current yet, so any period may be opened first.
        let opened = register.open(periods[2].id).unwrap();
        assert_eq!(opened.period_no, 3);
        assert!(opened.is_current);
        assert_eq!(register.current().unwrap().period_no, 3);
    }

    #[test]
    fn test_open_enforces_sequence() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();

        assert!(matches!(
            register.open(periods[2].id),
            Err(PeriodError::OutOfSequenceOpen { year: 2026, period: 3 })
        ));

        let february = register.open(periods[1].id).unwrap();
        assert_eq!(february.period_no, 2);
    }

    #[test]
    fn test_open_next_closes_previous() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();
        register.open(periods[1].id).unwrap();

        let january = register.get(2026, 1).unwrap();
        assert_eq!(january.status, PeriodStatus::Closed);
        assert!(!january.is_current);
        assert!(january.closed_at.is_some());
        assert_eq!(register.current().unwrap().period_no, 2);
    }

    #[test]
    fn test_open_january_after_december_and_after_adjustments() {
        let (mut register, periods_2026) = register_with_year(2026);
        let periods_2027 = register.create_year(2027).unwrap();

        register.open(periods_2026[11].id).unwrap();
        register.open(periods_2026[12].id).unwrap();
        let january = register.open(periods_2027[0].id).unwrap();
        assert_eq!((january.fiscal_year, january.period_no), (2027, 1));
    }

    #[test]
    fn test_close_requires_current() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();

        assert!(matches!(
            register.close(periods[1].id),
            Err(PeriodError::NotCurrentPeriod { year: 2026, period: 2 })
        ));

        let closed = register.close(periods[0].id).unwrap();
        assert_eq!(closed.status, PeriodStatus::Closed);
        assert!(closed.closed_at.is_some());
        // Still current until a successor opens.
        assert_eq!(register.current().unwrap().period_no, 1);
    }

    #[test]
    fn test_reopen_closed_period() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();
        register.close(periods[0].id).unwrap();

        let reopened = register.reopen(periods[0].id).unwrap();
        assert_eq!(reopened.status, PeriodStatus::Open);
        assert!(reopened.closed_at.is_none());
        assert!(reopened.is_current);
    }

    #[test]
    fn test_reopen_refused_while_later_period_open() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();
        register.open(periods[1].id).unwrap();

        assert!(matches!(
            register.reopen(periods[0].id),
            Err(PeriodError::LaterPeriodOpen { year: 2026, period: 2 })
        ));
    }

    #[test]
    fn test_reopen_allowed_when_later_period_closed() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();
        register.open(periods[1].id).unwrap();
        register.close(periods[1].id).unwrap();

        let reopened = register.reopen(periods[0].id).unwrap();
        assert!(reopened.is_current);
        // February lost currency to the reopened January.
        assert!(!register.get(2026, 2).unwrap().is_current);
        assert_eq!(register.current().unwrap().period_no, 1);
    }

    #[test]
    fn test_lock_grace_window() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();
        register.close(periods[0].id).unwrap();

        // Just closed: a 30-day grace window has 30 days remaining.
        assert!(matches!(
            register.lock(periods[0].id, 30),
            Err(PeriodError::LockGraceNotElapsed { days_remaining: 30 })
        ));

        // A zero-day window locks immediately.
        let locked = register.lock(periods[0].id, 0).unwrap();
        assert_eq!(locked.status, PeriodStatus::Locked);
    }

    #[test]
    fn test_locked_period_cannot_reopen() {
        let (mut register, periods) = register_with_year(2026);
        register.open(periods[0].id).unwrap();
        register.close(periods[0].id).unwrap();
        register.lock(periods[0].id, 0).unwrap();

        assert!(matches!(
            register.reopen(periods[0].id),
            Err(PeriodError::InvalidTransition {
                from: PeriodStatus::Locked,
                to: PeriodStatus::Open,
            })
        ));
    }

    #[test]
    fn test_archive_requires_prior_year() {
        let (mut register, periods_2026) = register_with_year(2026);
        let periods_2027 = register.create_year(2027).unwrap();

        register.open(periods_2026[0].id).unwrap();
        register.close(periods_2026[0].id).unwrap();
        register.lock(periods_2026[0].id, 0).unwrap();

        // Current period is still in 2026.
        assert!(matches!(
            register.archive(periods_2026[0].id),
            Err(PeriodError::ArchiveRequiresPriorYear { year: 2026 })
        ));

        // Roll forward to 2027 by opening every remaining 2026 period.
        for period in &periods_2026[1..] {
            register.open(period.id).unwrap();
        }
        register.open(periods_2027[0].id).unwrap();

        let archived = register.archive(periods_2026[0].id).unwrap();
        assert_eq!(archived.status, PeriodStatus::Archived);
    }

    #[test]
    fn test_find_for_date_skips_adjustment_window() {
        let (register, _) = register_with_year(2026);

        let march = register
            .find_for_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())
            .unwrap();
        assert_eq!(march.period_no, 3);

        // December 31 resolves to period 12, never to the adjustment
        // window that shares the date.
        let year_end = register
            .find_for_date(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap())
            .unwrap();
        assert_eq!(year_end.period_no, 12);

        assert!(register
            .find_for_date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .is_none());
    }

    #[test]
    fn test_record_posting_accumulates() {
        let (mut register, _) = register_with_year(2026);
        register.record_posting(2026, 1, 10000, 10000);
        register.record_posting(2026, 1, 2500, 2500);

        let january = register.get(2026, 1).unwrap();
        assert_eq!(january.posted_debit_minor, 12500);
        assert_eq!(january.posted_credit_minor, 12500);
    }

    #[rstest]
    #[case((2026, 1), (2026, 2), true)]
    #[case((2026, 12), (2026, 13), true)]
    #[case((2026, 12), (2027, 1), true)]
    #[case((2026, 13), (2027, 1), true)]
    #[case((2026, 1), (2026, 3), false)]
    #[case((2026, 11), (2027, 1), false)]
    #[case((2026, 12), (2027, 2), false)]
    fn test_follows(#[case] current: (i32, u8), #[case] next: (i32, u8), #[case] expected: bool) {
        assert_eq!(follows(current, next), expected);
    }
}
