use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::calendar::{self, MonthSpan};
use crate::error::{Error, ErrorKind, Result};

/// Longest range a single calendar may span.
pub const MAX_SPAN_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::new(
                ErrorKind::InvertedRange,
                &format!("{} is before {}", end, start),
            ));
        }

        let latest = latest_end(&start);
        if end > latest {
            return Err(Error::new(
                ErrorKind::RangeTooLong,
                &format!("{} is after {}", end, latest),
            ));
        }

        Ok(DateRange { start, end })
    }

    /// Validates raw user input. Checks run in order and stop at the first
    /// failure: missing date, unparseable date, inverted range, too long.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let (start, end) = match (non_blank(start), non_blank(end)) {
            (Some(start), Some(end)) => (start, end),
            (None, _) => return Err(Error::new(ErrorKind::MissingDate, "start date is empty")),
            (_, None) => return Err(Error::new(ErrorKind::MissingDate, "end date is empty")),
        };

        DateRange::new(calendar::parse_date(start)?, calendar::parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        (self.start..=self.end).contains(date)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn months(&self) -> MonthSpan {
        calendar::months_in_range(&self.start, &self.end)
    }
}

/// `start` moved forward by `MAX_SPAN_MONTHS` keeping its day of month.
/// Days the target month lacks carry over into the following month, so
/// 08-31 becomes 03-03 rather than 02-28.
fn latest_end(start: &NaiveDate) -> NaiveDate {
    calendar::first_of_month(start)
        .checked_add_months(Months::new(MAX_SPAN_MONTHS))
        .and_then(|first| first.checked_add_signed(Duration::days(start.day0() as i64)))
        .unwrap_or(NaiveDate::MAX)
}

fn non_blank(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(start: &str, end: &str) -> Option<ErrorKind> {
        DateRange::parse(Some(start), Some(end)).err().map(|e| e.kind)
    }

    #[test]
    fn missing_start() {
        assert!(matches!(kind_of("", "2025-06-01"), Some(ErrorKind::MissingDate)));
        assert!(matches!(
            DateRange::parse(None, Some("2025-06-01")).unwrap_err().kind,
            ErrorKind::MissingDate
        ));
    }

    #[test]
    fn missing_check_runs_before_parsing() {
        assert!(matches!(kind_of("garbage", "  "), Some(ErrorKind::MissingDate)));
        assert!(matches!(kind_of("garbage", "2025-01-01"), Some(ErrorKind::DateParse)));
    }

    #[test]
    fn end_before_start() {
        assert!(matches!(
            kind_of("2025-06-10", "2025-06-01"),
            Some(ErrorKind::InvertedRange)
        ));
    }

    #[test]
    fn longer_than_six_months() {
        assert!(matches!(
            kind_of("2025-01-01", "2025-08-01"),
            Some(ErrorKind::RangeTooLong)
        ));
        assert!(matches!(
            kind_of("2025-01-01", "2025-07-02"),
            Some(ErrorKind::RangeTooLong)
        ));
    }

    #[test]
    fn boundary_is_inclusive() {
        assert!(kind_of("2025-01-01", "2025-06-30").is_none());
        assert!(kind_of("2025-01-01", "2025-07-01").is_none());
        assert!(kind_of("2025-03-05", "2025-03-05").is_none());
    }

    #[test]
    fn short_target_month_rolls_over() {
        assert!(kind_of("2025-08-31", "2026-03-02").is_none());
        assert!(kind_of("2025-08-31", "2026-03-03").is_none());
        assert!(matches!(
            kind_of("2025-08-31", "2026-03-04"),
            Some(ErrorKind::RangeTooLong)
        ));

        // 2024 is a leap year: Feb 30 is one day past Feb 29
        assert!(kind_of("2023-08-30", "2024-03-01").is_none());
        assert!(matches!(
            kind_of("2023-08-30", "2024-03-02"),
            Some(ErrorKind::RangeTooLong)
        ));
    }

    #[test]
    fn latest_end_keeps_day_of_month() {
        let date = |s: &str| calendar::parse_date(s).unwrap();
        assert_eq!(latest_end(&date("2025-01-15")), date("2025-07-15"));
        assert_eq!(latest_end(&date("2025-12-31")), date("2026-07-01"));
    }

    #[test]
    fn days_and_contains() {
        let range = DateRange::parse(Some("2025-02-27"), Some("2025-03-02")).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 4);
        assert!(range.contains(&range.start()));
        assert!(range.contains(&range.end()));
        assert!(!range.contains(&NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()));
        assert_eq!(range.months().count(), 2);
    }
}
