//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as ISO-8601 with millisecond precision and a `Z` suffix
///
/// Produces the same shape as JavaScript's `Date.prototype.toISOString`,
/// which is what existing `metadata.json` entries carry
/// (e.g. `2024-05-01T12:00:00.000Z`).
pub fn iso_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
