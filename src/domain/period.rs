//! Day/month/year windows anchored at a reference date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    #[default]
    Day,
    Month,
    Year,
}

impl PeriodKind {
    /// Moves `anchor` one period forward (`direction > 0`) or backward.
    /// Month and year moves clamp to the last valid day.
    pub fn step(self, anchor: NaiveDate, direction: i32) -> NaiveDate {
        match self {
            PeriodKind::Day => anchor + Duration::days(direction as i64),
            PeriodKind::Month => shift_month(anchor, direction),
            PeriodKind::Year => shift_month(anchor, direction * 12),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::Day => "day",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PeriodKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "d" => Ok(PeriodKind::Day),
            "month" | "m" => Ok(PeriodKind::Month),
            "year" | "y" => Ok(PeriodKind::Year),
            other => Err(CoreError::invalid(format!("unknown period `{other}`"))),
        }
    }
}

/// Inclusive `[start, end]` instant bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::invalid("range end must not precede its start"));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar days from `first` through `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> CoreResult<Self> {
        Self::new(start_of_day(first), end_of_day(last))
    }

    pub fn for_period(kind: PeriodKind, anchor: NaiveDate) -> Self {
        let (first, last) = match kind {
            PeriodKind::Day => (anchor, anchor),
            PeriodKind::Month => (first_of_month(anchor), last_of_month(anchor)),
            PeriodKind::Year => (
                first_of_month(anchor).with_month(1).unwrap_or(anchor),
                NaiveDate::from_ymd_opt(anchor.year(), 12, 31).unwrap_or(anchor),
            ),
        };
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    /// From the first of the anchor's month through the end of the anchor's day.
    pub fn month_to_date(anchor: NaiveDate) -> Self {
        Self {
            start: start_of_day(first_of_month(anchor)),
            end: end_of_day(anchor),
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Validates a calendar date given as numbers.
pub fn anchor_from_ymd(year: i32, month: u32, day: u32) -> CoreResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        CoreError::invalid(format!("{year:04}-{month:02}-{day:02} is not a calendar date"))
    })
}

/// Parses `YYYY-MM-DD`.
pub fn parse_anchor(input: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::invalid(format!("`{input}` is not a calendar date")))
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 always exists
    date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let day = days_in_month(date.year(), date.month());
    date.with_day(day).unwrap_or(date)
}

/// Adds whole calendar months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Same as [`shift_month`] but keeps the time of day.
pub fn shift_month_time(instant: NaiveDateTime, months: i32) -> NaiveDateTime {
    shift_month(instant.date(), months).and_time(instant.time())
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_milli_opt(h, min, s, ms).unwrap()
    }

    #[test]
    fn month_range_covers_whole_month() {
        let range = DateRange::for_period(PeriodKind::Month, date(2025, 3, 15));
        assert_eq!(range.start, at(2025, 3, 1, 0, 0, 0, 0));
        assert_eq!(range.end, at(2025, 3, 31, 23, 59, 59, 999));
    }

    #[test]
    fn leap_february_ends_on_29th() {
        let range = DateRange::for_period(PeriodKind::Month, date(2024, 2, 10));
        assert_eq!(range.end.date(), date(2024, 2, 29));
    }

    #[test]
    fn day_and_year_bounds() {
        let day = DateRange::for_period(PeriodKind::Day, date(2025, 7, 4));
        assert_eq!(day.start, at(2025, 7, 4, 0, 0, 0, 0));
        assert_eq!(day.end, at(2025, 7, 4, 23, 59, 59, 999));

        let year = DateRange::for_period(PeriodKind::Year, date(2025, 7, 4));
        assert_eq!(year.start, at(2025, 1, 1, 0, 0, 0, 0));
        assert_eq!(year.end, at(2025, 12, 31, 23, 59, 59, 999));
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::for_period(PeriodKind::Day, date(2025, 7, 4));
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(at(2025, 7, 5, 0, 0, 0, 0)));
        assert!(!range.contains(at(2025, 7, 3, 23, 59, 59, 999)));
    }

    #[test]
    fn shift_month_clamps_to_month_end() {
        assert_eq!(shift_month(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2025, 1, 31), 2), date(2025, 3, 31));
        assert_eq!(shift_month(date(2025, 11, 30), 3), date(2026, 2, 28));
        assert_eq!(shift_month(date(2025, 1, 15), -1), date(2024, 12, 15));
    }

    #[test]
    fn step_moves_one_period() {
        assert_eq!(PeriodKind::Day.step(date(2025, 3, 1), -1), date(2025, 2, 28));
        assert_eq!(PeriodKind::Month.step(date(2025, 3, 31), 1), date(2025, 4, 30));
        assert_eq!(PeriodKind::Year.step(date(2024, 2, 29), 1), date(2025, 2, 28));
    }

    #[test]
    fn anchor_validation() {
        assert!(anchor_from_ymd(2025, 2, 30).is_err());
        assert!(anchor_from_ymd(2025, 13, 1).is_err());
        assert_eq!(anchor_from_ymd(2024, 2, 29).unwrap(), date(2024, 2, 29));
        assert_eq!(parse_anchor("2025-03-15").unwrap(), date(2025, 3, 15));
        assert!(parse_anchor("2025-02-30").is_err());
    }

    #[test]
    fn period_kind_parses_labels() {
        assert_eq!("Month".parse::<PeriodKind>().unwrap(), PeriodKind::Month);
        assert!("week".parse::<PeriodKind>().is_err());
    }
}
