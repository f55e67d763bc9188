//! Timestamp utilities

use chrono::{DateTime, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Resolve a Julian day-of-year (1-366) against a calendar year, at a
/// canonical time of day (noon UTC, keeping the date stable across offsets).
///
/// Barcoded boarding passes encode only the day-of-year, never the year.
/// Out-of-range days overflow into the following year, matching how date
/// arithmetic resolved them in the legacy mobile client.
pub fn day_of_year_to_date(year: i32, day_of_year: u32) -> DateTime<Utc> {
    let jan_first = Utc.with_ymd_and_hms(year, 1, 1, 12, 0, 0).unwrap();
    jan_first + chrono::Duration::days(day_of_year as i64 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_day_one_is_january_first() {
        let date = day_of_year_to_date(2025, 1);
        assert_eq!((date.year(), date.month(), date.day()), (2025, 1, 1));
    }

    #[test]
    fn test_day_32_is_february_first() {
        let date = day_of_year_to_date(2025, 32);
        assert_eq!((date.month(), date.day()), (2, 1));
    }

    #[test]
    fn test_day_366_overflows_non_leap_year() {
        let date = day_of_year_to_date(2025, 366);
        assert_eq!((date.year(), date.month(), date.day()), (2026, 1, 1));
    }

    #[test]
    fn test_leap_year_day_60() {
        let date = day_of_year_to_date(2024, 60);
        assert_eq!((date.month(), date.day()), (2, 29));
    }
}
