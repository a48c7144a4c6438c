//! Fiscal period types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use tally_shared::types::PeriodId;

/// The reserved period number for year-end adjustments.
pub const ADJUSTMENT_PERIOD_NO: u8 = 13;

/// Status of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period is not yet open for postings.
    Future,
    /// Period is open for postings.
    Open,
    /// Period is closed, no new postings allowed.
    Closed,
    /// Period is locked after the retention grace window; cannot reopen.
    Locked,
    /// Period is archived at year rollover.
    Archived,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Locked => "locked",
            Self::Archived => "archived",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "future" => Some(Self::Future),
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "locked" => Some(Self::Locked),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Returns true if the period accepts postings.
    #[must_use]
    pub fn allows_posting(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Ordinary calendar period.
    Regular,
    /// Adjustment window (period 13).
    Adjustment,
    /// Year-end closing period.
    YearEnd,
    /// Opening-balance period.
    Opening,
}

/// A fiscal period within a fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Unique identifier.
    pub id: PeriodId,
    /// Fiscal year this period belongs to.
    pub fiscal_year: i32,
    /// Period number within the year (1-13; 13 is the adjustment window).
    pub period_no: u8,
    /// Period name (e.g., "January 2026").
    pub name: String,
    /// Start date of the period.
    pub start_date: NaiveDate,
    /// End date of the period.
    pub end_date: NaiveDate,
    /// Period classification.
    pub period_type: PeriodType,
    /// Current status.
    pub status: PeriodStatus,
    /// Whether this is the current period (at most one at any time).
    pub is_current: bool,
    /// When the period was last closed; gates the lock grace window.
    pub closed_at: Option<DateTime<Utc>>,
    /// Running total of posted debits, in minor units.
    pub posted_debit_minor: i64,
    /// Running total of posted credits, in minor units.
    pub posted_credit_minor: i64,
}

impl Period {
    /// Returns true if postings are accepted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Returns the last day of the given month.
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Generates the periods of a calendar fiscal year: twelve monthly Regular
/// periods plus the period-13 Adjustment window.
///
/// The adjustment window is anchored on December 31 (`start == end`) so
/// date-range lookup over Regular periods stays unambiguous; it is
/// addressed explicitly by (year, 13).
///
/// Returns `None` if the year is outside chrono's representable range.
pub fn generate_year_periods(year: i32) -> Option<Vec<Period>> {
    let month_names = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    let mut periods = Vec::with_capacity(13);
    for month in 1..=12_u32 {
        let start_date = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end_date = last_day_of_month(year, month)?;
        let name = month_names.get(month as usize - 1)?;
        periods.push(Period {
            id: PeriodId::new(),
            fiscal_year: year,
            period_no: u8::try_from(month).ok()?,
            name: format!("{name} {year}"),
            start_date,
            end_date,
            period_type: PeriodType::Regular,
            status: PeriodStatus::Future,
            is_current: false,
            closed_at: None,
            posted_debit_minor: 0,
            posted_credit_minor: 0,
        });
    }

    let year_end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    periods.push(Period {
        id: PeriodId::new(),
        fiscal_year: year,
        period_no: ADJUSTMENT_PERIOD_NO,
        name: format!("Adjustments {year}"),
        start_date: year_end,
        end_date: year_end,
        period_type: PeriodType::Adjustment,
        status: PeriodStatus::Future,
        is_current: false,
        closed_at: None,
        posted_debit_minor: 0,
        posted_credit_minor: 0,
    });

    Some(periods)
}
