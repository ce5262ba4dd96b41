//! Wall-clock helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time as an ISO-8601 string with millisecond precision, e.g.
/// `2026-03-10T18:29:59.000Z`.
pub fn now_iso8601() -> String {
    to_iso8601(Utc::now())
}

pub fn to_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
