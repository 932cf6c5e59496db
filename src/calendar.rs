//! Mapping between hour indices and calendar dates.
//!
//! The simulation covers 8760 hours starting at midnight on January 1st of the
//! base year. The base year is only used for month lookup and schedule-window
//! comparisons.
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// The base year used for hour-to-date conversion
pub const BASE_YEAR: i32 = 2024;

/// Midnight on January 1st of the base year
fn base_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(BASE_YEAR, 1, 1)
        .expect("valid base date")
        .and_hms_opt(0, 0, 0)
        .expect("valid base time")
}

/// The calendar datetime for the given hour index (0-8759)
pub fn datetime_for_hour(hour: usize) -> NaiveDateTime {
    base_datetime() + Duration::hours(hour as i64)
}

/// The calendar month (1-12) for the given hour index
pub fn month_for_hour(hour: usize) -> u32 {
    datetime_for_hour(hour).month()
}

/// Whether the given month falls in the summer season (May to September)
pub fn is_summer(month: u32) -> bool {
    (5..=9).contains(&month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)] // Jan 1st, 00:00
    #[case(23, 1)] // Jan 1st, 23:00
    #[case(24 * 31, 2)] // Feb 1st
    #[case(8759, 12)] // Dec 30th, 23:00 (2024 is a leap year)
    fn test_month_for_hour(#[case] hour: usize, #[case] month: u32) {
        assert_eq!(month_for_hour(hour), month);
    }

    #[rstest]
    #[case(4, false)]
    #[case(5, true)]
    #[case(9, true)]
    #[case(10, false)]
    fn test_is_summer(#[case] month: u32, #[case] summer: bool) {
        assert_eq!(is_summer(month), summer);
    }
}
