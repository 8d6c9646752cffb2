//! Date-key helpers
//!
//! Shared by the bucketing, calendar and analytics views. Record
//! timestamps are stored in UTC; a record's calendar day is taken in the
//! caller's time zone so that bucket boundaries and record dates agree.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::error::{Error, Result};

/// Weekday labels indexed from Sunday (0) to Saturday (6)
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Month names indexed from January (1) at position 0
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Calendar date of a UTC timestamp as seen in `tz`.
pub fn local_date<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// The `len` consecutive dates starting at `start`.
pub fn window_dates(start: NaiveDate, len: u32) -> Vec<NaiveDate> {
    (0..len as i64).map(|offset| start + Duration::days(offset)).collect()
}

/// First day of the `len`-day window that ends on `end` (inclusive).
pub fn trailing_window_start(end: NaiveDate, len: u32) -> NaiveDate {
    end - Duration::days(len.saturating_sub(1) as i64)
}

/// Short weekday label ("Sun".."Sat") of a date.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}

fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(Error::validation(format!("month must be 1-12, got {}", month)))
    }
}

/// First day of a month
pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    check_month(month)?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::validation(format!("year {} out of range", year)))
}

/// Number of days in a month, February of leap years included.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let (next_year, next_month) = shift_month(year, month, 1)?;
    let next_first = first_of_month(next_year, next_month)?;
    Ok((next_first - first).num_days() as u32)
}

/// Weekday index of the 1st of the month, 0 = Sunday.
pub fn first_weekday_of_month(year: i32, month: u32) -> Result<u32> {
    Ok(first_of_month(year, month)?.weekday().num_days_from_sunday())
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = first_of_month(year, month)?;
    let end = start + Duration::days(days_in_month(year, month)? as i64 - 1);
    Ok((start, end))
}

/// Move `delta` months forward (negative = backward) from `year`/`month`.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Result<(i32, u32)> {
    check_month(month)?;
    let index = year as i64 * 12 + (month as i64 - 1) + delta as i64;
    let new_year = index.div_euclid(12);
    let new_month = index.rem_euclid(12) as u32 + 1;
    let new_year = i32::try_from(new_year)
        .map_err(|_| Error::validation(format!("year {} out of range", new_year)))?;
    Ok((new_year, new_month))
}

/// Parse a `YYYY-MM` month key.
pub fn parse_month_key(s: &str) -> Result<(i32, u32)> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| Error::validation(format!("Invalid month: {}. Use YYYY-MM", s)))?;
    let year: i32 = year
        .parse()
        .map_err(|_| Error::validation(format!("Invalid year in month: {}", s)))?;
    let month: u32 = month
        .parse()
        .map_err(|_| Error::validation(format!("Invalid month number in: {}", s)))?;
    check_month(month)?;
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_local_date_uses_zone() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        assert_eq!(local_date(&ts, &Utc), date(2024, 5, 1));
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(local_date(&ts, &plus_two), date(2024, 5, 2));
    }

    #[test]
    fn test_window_dates() {
        let days = window_dates(date(2024, 2, 27), 4);
        assert_eq!(
            days,
            vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
        assert!(window_dates(date(2024, 1, 1), 0).is_empty());
    }

    #[test]
    fn test_trailing_window_start() {
        assert_eq!(trailing_window_start(date(2024, 3, 7), 7), date(2024, 3, 1));
        assert_eq!(trailing_window_start(date(2024, 3, 7), 0), date(2024, 3, 7));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(2024, 12).unwrap(), 31);
        assert_eq!(days_in_month(2024, 4).unwrap(), 30);
        assert!(days_in_month(2024, 13).is_err());
    }

    #[test]
    fn test_first_weekday_of_month() {
        // 2024-01-01 was a Monday
        assert_eq!(first_weekday_of_month(2024, 1).unwrap(), 1);
        // 2023-10-01 was a Sunday
        assert_eq!(first_weekday_of_month(2023, 10).unwrap(), 0);
    }

    #[test]
    fn test_shift_month_wraps_years() {
        assert_eq!(shift_month(2024, 12, 1).unwrap(), (2025, 1));
        assert_eq!(shift_month(2024, 1, -1).unwrap(), (2023, 12));
        assert_eq!(shift_month(2024, 6, -18).unwrap(), (2022, 12));
        assert!(shift_month(2024, 0, 1).is_err());
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2024, 2).unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_parse_month_key() {
        assert_eq!(parse_month_key("2024-02").unwrap(), (2024, 2));
        assert!(parse_month_key("2024-13").is_err());
        assert!(parse_month_key("202402").is_err());
    }

    #[test]
    fn test_weekday_label() {
        assert_eq!(weekday_label(date(2024, 1, 1)), "Mon");
        assert_eq!(weekday_label(date(2024, 1, 7)), "Sun");
    }
}
