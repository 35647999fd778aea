//! Last-visited marker formatting.
//!
//! The last-visited timestamp is persisted as an ISO-8601 string and shown to the
//! user as a short relative label.

use chrono::{DateTime, Utc};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Returns a human-readable string describing how long before `now` the
/// timestamp `then` lies.
///
/// The format varies based on the time elapsed:
/// - Less than 1 minute (or in the future): "just now"
/// - Less than 1 hour: "Xm ago" (e.g., "5m ago")
/// - Less than 1 day: "Xh ago" (e.g., "3h ago")
/// - 1 day or more: "Xd ago" (e.g., "7d ago")
///
/// # Examples
///
/// ```
/// use catalog_browser::domain::time_ago;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now, now), "just now");
/// assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
/// ```
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - then).num_seconds();

    if diff < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if diff < SECONDS_PER_HOUR {
        let mins = diff / SECONDS_PER_MINUTE;
        format!("{mins}m ago")
    } else if diff < SECONDS_PER_DAY {
        let hours = diff / SECONDS_PER_HOUR;
        format!("{hours}h ago")
    } else {
        let days = diff / SECONDS_PER_DAY;
        format!("{days}d ago")
    }
}
