use std::fmt::Write;

use chrono::{Local, TimeZone};

/// Default strftime pattern for hover dates.
pub const DEFAULT_DATE_FORMAT: &str = "%c";

/// Format `instant` (unix seconds) in the local time zone using a strftime
/// pattern. Returns `None` for out-of-range instants or invalid patterns.
pub fn absolute_time(instant: i64, pattern: &str) -> Option<String> {
    let datetime = Local.timestamp_opt(instant, 0).single()?;
    let mut out = String::new();
    write!(out, "{}", datetime.format(pattern)).ok()?;
    Some(out)
}
