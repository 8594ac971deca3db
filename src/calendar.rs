//! Calendar arithmetic shared by plan windows and statistics.
//! All day boundaries are UTC midnights.

use chrono::{DateTime, Datelike, NaiveTime, Utc};

pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
  at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Whole calendar days from `start` to `end` (negative if `end` is earlier)
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
  (end.date_naive() - start.date_naive()).num_days()
}

/// Same ISO-8601 week, including the ISO week-year
pub fn same_week(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
  a.iso_week() == b.iso_week()
}

/// Medium-style date label, e.g. "Jan 5, 2025"
pub fn medium_date(at: DateTime<Utc>) -> String {
  at.format("%b %-d, %Y").to_string()
}

/// Medium date with a short time, e.g. "Jan 5, 2025, 6:30 PM"
pub fn medium_date_time(at: DateTime<Utc>) -> String {
  at.format("%b %-d, %Y, %-I:%M %p").to_string()
}
