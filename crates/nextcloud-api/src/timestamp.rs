//! Conversion between `DAV:getlastmodified` dates and Unix timestamps.
//!
//! Only the RFC1123 production (`Sun, 09 Sep 2001 01:46:40 GMT`) is accepted.
//! Anything else parses to `None`, which callers treat as "timestamp unknown".

use chrono::{DateTime, NaiveDateTime, Timelike};

/// `strftime` pattern of an RFC1123 date as sent by WebDAV servers.
pub const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse an RFC1123 date into epoch seconds (UTC). A leap second (`:60`)
/// is not a valid time of day here.
pub fn parse_rfc1123(date: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(date, RFC1123_FORMAT)
        .ok()
        .filter(|dt| dt.nanosecond() < 1_000_000_000)
        .map(|dt| dt.and_utc().timestamp())
}

/// Format epoch seconds as an RFC1123 date in UTC.
pub fn format_rfc1123(epoch: i64) -> Option<String> {
    DateTime::from_timestamp(epoch, 0).map(|dt| dt.format(RFC1123_FORMAT).to_string())
}
