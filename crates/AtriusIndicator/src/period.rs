//! Reporting periods and their day counts.
//!
//! The `[days]` placeholder resolves to the number of days in the
//! evaluated period. Callers that work with calendar periods can use
//! [`ReportingPeriod`] to derive that count instead of hand-computing it.

use chrono::NaiveDate;

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportingPeriod {
    /// Create a period from inclusive start and end dates.
    ///
    /// Returns `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if end < start {
            return None;
        }
        Some(ReportingPeriod { start, end })
    }

    /// The calendar month `year`-`month`.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(ReportingPeriod {
            start,
            end: next.pred_opt()?,
        })
    }

    /// The calendar quarter `year`-Q`quarter` (1-4).
    pub fn quarter(year: i32, quarter: u32) -> Option<Self> {
        if !(1..=4).contains(&quarter) {
            return None;
        }
        let first_month = (quarter - 1) * 3 + 1;
        let start = NaiveDate::from_ymd_opt(year, first_month, 1)?;
        let end = Self::month(year, first_month + 2)?.end;
        Some(ReportingPeriod { start, end })
    }

    /// The calendar year.
    pub fn year(year: i32) -> Option<Self> {
        Some(ReportingPeriod {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// First day of the period.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the period, inclusive of both endpoints.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
