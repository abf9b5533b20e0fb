use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    #[display(fmt = "sunday")]
    #[serde(alias = "sun")]
    Sunday,
    #[display(fmt = "monday")]
    #[serde(alias = "mon")]
    Monday,
}

impl WeekStart {
    /// Column of `weekday` in a week row.
    pub fn offset(&self, weekday: Weekday) -> u32 {
        let native = weekday.num_days_from_sunday();
        match self {
            WeekStart::Sunday => native,
            WeekStart::Monday => (native + 6) % 7,
        }
    }

    pub fn first_day(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Weekdays in column order.
    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> {
        std::iter::successors(Some(self.first_day()), |day| Some(day.succ())).take(7)
    }
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Ok(WeekStart::Sunday),
            "mon" | "monday" => Ok(WeekStart::Monday),
            other => Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("unknown week start '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    #[display(fmt = "by-month")]
    #[serde(alias = "month")]
    ByMonth,
    #[display(fmt = "continuous")]
    Continuous,
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "month" | "by-month" => Ok(Layout::ByMonth),
            "continuous" => Ok(Layout::Continuous),
            other => Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("unknown layout '{}'", other),
            )),
        }
    }
}

pub fn first_of_month(date: &NaiveDate) -> NaiveDate {
    *date - Duration::days(date.day0() as i64)
}

pub fn days_of_month(date: &NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        // Only December of the last representable year overflows
        None => 31,
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
        .map_err(|e| Error::new(ErrorKind::DateParse, &format!("'{}': {}", s.trim(), e)))
}

/// First-of-month dates of every month touched by `start..=end`.
pub fn months_in_range(start: &NaiveDate, end: &NaiveDate) -> MonthSpan {
    MonthSpan {
        next: Some(first_of_month(start)),
        last: first_of_month(end),
    }
}

#[derive(Debug, Clone)]
pub struct MonthSpan {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for MonthSpan {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|month| *month <= self.last)?;
        self.next = current.checked_add_months(Months::new(1));
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_of_month(&ymd(2025, 1, 15)), 31);
        assert_eq!(days_of_month(&ymd(2025, 2, 1)), 28);
        assert_eq!(days_of_month(&ymd(2024, 2, 29)), 29);
        assert_eq!(days_of_month(&ymd(2025, 4, 30)), 30);
        assert_eq!(days_of_month(&ymd(2025, 12, 31)), 31);
    }

    #[test]
    fn months_cover_both_endpoints() {
        let months = months_in_range(&ymd(2025, 11, 20), &ymd(2026, 2, 3)).collect_vec();
        assert_eq!(
            months,
            vec![ymd(2025, 11, 1), ymd(2025, 12, 1), ymd(2026, 1, 1), ymd(2026, 2, 1)]
        );
    }

    #[test]
    fn single_month_range() {
        let months = months_in_range(&ymd(2025, 3, 5), &ymd(2025, 3, 7)).collect_vec();
        assert_eq!(months, vec![ymd(2025, 3, 1)]);
    }

    #[test]
    fn months_are_ordered_and_match_endpoints() {
        let start = ymd(2025, 1, 31);
        for span in 0..=180 {
            let end = start + Duration::days(span);
            let months = months_in_range(&start, &end).collect_vec();
            assert!(!months.is_empty());
            assert_eq!(months.first().map(|m| m.month()), Some(start.month()));
            assert_eq!(months.last().map(|m| m.month()), Some(end.month()));
            assert!(months.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn monday_offset_is_rotated_sunday_offset() {
        for weekday in WeekStart::Sunday.weekdays() {
            let sunday = WeekStart::Sunday.offset(weekday);
            assert_eq!(WeekStart::Monday.offset(weekday), (sunday + 6) % 7);
        }
        assert_eq!(WeekStart::Monday.offset(Weekday::Mon), 0);
        assert_eq!(WeekStart::Monday.offset(Weekday::Sun), 6);
        assert_eq!(WeekStart::Sunday.offset(Weekday::Wed), 3);
    }

    #[test]
    fn weekday_columns() {
        assert_eq!(
            WeekStart::Monday.weekdays().collect_vec(),
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun
            ]
        );
        assert_eq!(WeekStart::Sunday.weekdays().last(), Some(Weekday::Sat));
    }

    #[test]
    fn parse_and_format_keys() {
        let date = parse_date(" 2025-03-05 ").unwrap();
        assert_eq!(date, ymd(2025, 3, 5));
        assert_eq!(date.to_string(), "2025-03-05");
        assert!(matches!(
            parse_date("2025-02-30").unwrap_err().kind,
            ErrorKind::DateParse
        ));
    }

    #[test]
    fn mode_names() {
        assert_eq!("mon".parse::<WeekStart>().unwrap(), WeekStart::Monday);
        assert_eq!("Sunday".parse::<WeekStart>().unwrap(), WeekStart::Sunday);
        assert_eq!("month".parse::<Layout>().unwrap(), Layout::ByMonth);
        assert_eq!(Layout::Continuous.to_string(), "continuous");
        assert!("weekly".parse::<Layout>().is_err());
    }
}
