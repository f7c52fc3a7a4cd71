const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Format the distance between `instant` and `now` (both unix seconds) as a
/// coarse "N units ago" string.
///
/// Months are 30 days and years are 365 days; no calendar arithmetic is done.
/// An `instant` in the future reads as "0 seconds ago".
pub fn relative_time(instant: i64, now: i64) -> String {
    let elapsed = now.saturating_sub(instant).max(0);

    let (count, unit) = if elapsed < MINUTE {
        (elapsed, "second")
    } else if elapsed < HOUR {
        (elapsed / MINUTE, "minute")
    } else if elapsed < DAY {
        (elapsed / HOUR, "hour")
    } else if elapsed < MONTH {
        (elapsed / DAY, "day")
    } else if elapsed < YEAR {
        (elapsed / MONTH, "month")
    } else {
        (elapsed / YEAR, "year")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
