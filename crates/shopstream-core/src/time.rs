//! Time truncation helpers shared by aggregation and queries.

use chrono::{DateTime, Timelike, Utc};

const SECONDS_PER_HOUR: i64 = 3_600;

/// Truncates `at` to the start of its hour.
#[must_use]
pub fn floor_to_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    let seconds = at.timestamp().div_euclid(SECONDS_PER_HOUR) * SECONDS_PER_HOUR;
    DateTime::from_timestamp(seconds, 0).unwrap_or(at)
}

/// Drops the sub-second part of `at`.
#[must_use]
pub fn floor_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_nanosecond(0).unwrap_or(at)
}
