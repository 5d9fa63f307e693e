//! Timestamp formatting shared by the exporter, markdown and HTML output.
//!
//! Everything is rendered in UTC so the same document produces the same
//! output on every machine.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

fn to_utc(timestamp: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(timestamp: i64) -> String {
    to_utc(timestamp).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `Jan 5`
pub fn short_date(timestamp: i64) -> String {
    to_utc(timestamp).format("%b %-d").to_string()
}

/// `Jan 5, 2024`
pub fn long_date(timestamp: i64) -> String {
    to_utc(timestamp).format("%b %-d, %Y").to_string()
}

/// Calendar day (UTC) of a timestamp
pub fn utc_day(timestamp: i64) -> NaiveDate {
    to_utc(timestamp).date_naive()
}

pub fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
