//! Month grid, date keys and time aggregation.
//!
//! Everything here works on plain calendar dates (`NaiveDate`). The only
//! place a clock is read is [`today`], which takes the local calendar day.

use std::fmt;

use chrono::{Datelike, Days, Local, Months, NaiveDate};

use crate::entry::DateKey;
use crate::ledger::StudyLedger;

/// Cells in a month view: 6 weeks of 7 days.
pub const GRID_CELLS: usize = 42;

/// One position of the month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
}

impl CalendarCell {
    pub fn key(&self) -> DateKey {
        date_key(self.date)
    }
}

/// The local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_key(date: NaiveDate) -> DateKey {
    DateKey::new(date)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    let next = shift_month(first, 1);
    (next - first).num_days() as u32
}

/// Sunday-first 6x7 grid for the month containing `reference`.
///
/// Starts with the trailing days of the previous month (one per weekday before
/// the 1st), then the month itself, then leading days of the next month up to
/// [`GRID_CELLS`].
pub fn month_grid(reference: NaiveDate) -> Vec<CalendarCell> {
    let first = first_of_month(reference);
    let leading = u64::from(first.weekday().num_days_from_sunday());
    let start = first - Days::new(leading);

    start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| CalendarCell {
            date,
            is_current_month: date.year() == first.year() && date.month() == first.month(),
        })
        .collect()
}

/// Move by whole months. The day is clamped to the target month's length
/// (Jan 31 + 1 month is the last day of February).
pub fn shift_month(reference: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        reference.checked_add_months(months)
    } else {
        reference.checked_sub_months(months)
    };
    shifted.unwrap_or(reference)
}

/// Heading for a month view, e.g. "March 2024".
pub fn month_label(reference: NaiveDate) -> String {
    reference.format("%B %Y").to_string()
}

/// Summed study time, with minutes always below 60.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeTotal {
    pub hours: u64,
    pub minutes: u64,
}

impl TimeTotal {
    pub fn from_minutes(total: u64) -> Self {
        TimeTotal {
            hours: total / 60,
            minutes: total % 60,
        }
    }
}

impl fmt::Display for TimeTotal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Which entries a total covers, relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month,
    Year,
    AllTime,
}

impl Period {
    pub fn contains(&self, reference: NaiveDate, date: NaiveDate) -> bool {
        match self {
            Period::Month => date.year() == reference.year() && date.month() == reference.month(),
            Period::Year => date.year() == reference.year(),
            Period::AllTime => true,
        }
    }
}

/// Sum every entry whose day satisfies `predicate`.
pub fn aggregate<F>(ledger: &StudyLedger, predicate: F) -> TimeTotal
where
    F: Fn(NaiveDate) -> bool,
{
    let total = ledger
        .iter()
        .filter(|(key, _)| predicate(key.date()))
        .map(|(_, entry)| entry.total_minutes())
        .sum();

    TimeTotal::from_minutes(total)
}

pub fn period_total(ledger: &StudyLedger, period: Period, reference: NaiveDate) -> TimeTotal {
    aggregate(ledger, |date| period.contains(reference, date))
}

pub fn monthly_total(ledger: &StudyLedger, reference: NaiveDate) -> TimeTotal {
    period_total(ledger, Period::Month, reference)
}

pub fn yearly_total(ledger: &StudyLedger, reference: NaiveDate) -> TimeTotal {
    period_total(ledger, Period::Year, reference)
}

pub fn all_time_total(ledger: &StudyLedger) -> TimeTotal {
    aggregate(ledger, |_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::StudyEntry;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grid_always_has_42_cells() {
        for year in [2023, 2024, 2100] {
            for month in 1..=12 {
                let reference = ymd(year, month, 15);
                let grid = month_grid(reference);
                assert_eq!(grid.len(), GRID_CELLS, "{year}-{month}");

                let current = grid.iter().filter(|c| c.is_current_month).count();
                assert_eq!(current as u32, days_in_month(reference), "{year}-{month}");
            }
        }
    }

    #[test]
    fn test_grid_pads_with_adjacent_months() {
        // March 2024 starts on a Friday.
        let grid = month_grid(ymd(2024, 3, 20));

        assert_eq!(grid[0].date, ymd(2024, 2, 25));
        assert!(!grid[0].is_current_month);
        assert_eq!(grid[5].date, ymd(2024, 3, 1));
        assert!(grid[5].is_current_month);
        assert_eq!(grid[35].date, ymd(2024, 3, 31));
        assert_eq!(grid[41].date, ymd(2024, 4, 6));
        assert!(!grid[41].is_current_month);
    }

    #[test]
    fn test_grid_for_month_starting_on_sunday() {
        // September 2024 starts on a Sunday: no leading days.
        let grid = month_grid(ymd(2024, 9, 1));
        assert_eq!(grid[0].date, ymd(2024, 9, 1));
        assert!(grid[0].is_current_month);
        assert_eq!(grid[41].date, ymd(2024, 10, 12));
    }

    #[test]
    fn test_leap_february() {
        assert_eq!(days_in_month(ymd(2024, 2, 10)), 29);
        assert_eq!(days_in_month(ymd(2023, 2, 10)), 28);
        assert_eq!(days_in_month(ymd(2000, 2, 1)), 29);
        assert_eq!(days_in_month(ymd(1900, 2, 1)), 28);
    }

    #[test]
    fn test_date_key_is_stable() {
        let cell = month_grid(ymd(2024, 3, 5))[9];
        assert_eq!(cell.key().to_string(), "2024-03-05");
        assert_eq!(cell.key(), date_key(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_shift_month_clamps_day() {
        assert_eq!(shift_month(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
        assert_eq!(shift_month(ymd(2024, 3, 31), -1), ymd(2024, 2, 29));
        assert_eq!(shift_month(ymd(2024, 12, 10), 1), ymd(2025, 1, 10));
        assert_eq!(shift_month(ymd(2024, 1, 10), -1), ymd(2023, 12, 10));
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(ymd(2024, 3, 5)), "March 2024");
    }

    #[test]
    fn test_aggregate_renormalizes_minutes() {
        let ledger: StudyLedger = [
            (date_key(ymd(2024, 3, 1)), StudyEntry::new(1, 20, None)),
            (date_key(ymd(2024, 3, 2)), StudyEntry::new(0, 45, None)),
        ]
        .into_iter()
        .collect();

        assert_eq!(all_time_total(&ledger), TimeTotal { hours: 2, minutes: 5 });
    }

    #[test]
    fn test_period_totals() {
        let ledger: StudyLedger = [
            (date_key(ymd(2024, 3, 5)), StudyEntry::new(1, 30, Some("algebra"))),
            (date_key(ymd(2024, 3, 28)), StudyEntry::new(0, 40, None)),
            (date_key(ymd(2024, 7, 1)), StudyEntry::new(2, 0, None)),
            (date_key(ymd(2023, 3, 5)), StudyEntry::new(5, 0, None)),
        ]
        .into_iter()
        .collect();
        let reference = ymd(2024, 3, 15);

        assert_eq!(monthly_total(&ledger, reference), TimeTotal { hours: 2, minutes: 10 });
        assert_eq!(yearly_total(&ledger, reference), TimeTotal { hours: 4, minutes: 10 });
        assert_eq!(all_time_total(&ledger), TimeTotal { hours: 9, minutes: 10 });
    }

    #[test]
    fn test_empty_ledger_totals_zero() {
        let ledger = StudyLedger::new();
        assert_eq!(monthly_total(&ledger, ymd(2024, 3, 1)), TimeTotal::default());
        assert_eq!(TimeTotal::default().to_string(), "0h 0m");
    }
}
