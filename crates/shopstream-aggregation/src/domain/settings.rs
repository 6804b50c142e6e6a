//! Validated aggregation tuning knobs.

use std::time::Duration;

use chrono::TimeDelta;
use shopstream_core::error::DomainError;

/// Shortest accepted delay between scheduled runs, in milliseconds.
pub const MIN_FIXED_DELAY_MS: u64 = 5_000;
/// Largest accepted lag behind the clock, in seconds.
pub const MAX_LAG_SECONDS: u32 = 300;
/// Accepted lookback range, in hours.
pub const LOOKBACK_HOURS_RANGE: std::ops::RangeInclusive<u32> = 1..=72;

/// Timer period, lag and lookback for the Aggregation Engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationSettings {
    /// Wait between the end of one scheduled run and the start of the next.
    pub fixed_delay: Duration,
    /// How far behind the clock the upper bound trails.
    pub lag: TimeDelta,
    /// Trailing span re-scanned on every run.
    pub lookback: TimeDelta,
}

impl AggregationSettings {
    /// Validates raw configuration values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a value is out of range.
    pub fn new(
        fixed_delay_ms: u64,
        lag_seconds: u32,
        lookback_hours: u32,
    ) -> Result<Self, DomainError> {
        if fixed_delay_ms < MIN_FIXED_DELAY_MS {
            return Err(DomainError::Validation(format!(
                "aggregation fixed delay must be >= {MIN_FIXED_DELAY_MS} ms, got {fixed_delay_ms}"
            )));
        }
        if lag_seconds > MAX_LAG_SECONDS {
            return Err(DomainError::Validation(format!(
                "aggregation lag must be between 0 and {MAX_LAG_SECONDS} seconds, got {lag_seconds}"
            )));
        }
        if !LOOKBACK_HOURS_RANGE.contains(&lookback_hours) {
            return Err(DomainError::Validation(format!(
                "aggregation lookback must be between {} and {} hours, got {lookback_hours}",
                LOOKBACK_HOURS_RANGE.start(),
                LOOKBACK_HOURS_RANGE.end()
            )));
        }

        Ok(Self {
            fixed_delay: Duration::from_millis(fixed_delay_ms),
            lag: TimeDelta::seconds(i64::from(lag_seconds)),
            lookback: TimeDelta::hours(i64::from(lookback_hours)),
        })
    }
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            fixed_delay: Duration::from_millis(60_000),
            lag: TimeDelta::seconds(30),
            lookback: TimeDelta::hours(6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_within_bounds() {
        let defaults = AggregationSettings::default();

        let validated = AggregationSettings::new(60_000, 30, 6).unwrap();

        assert_eq!(defaults, validated);
    }

    #[test]
    fn test_accepts_boundary_values() {
        assert!(AggregationSettings::new(5_000, 0, 1).is_ok());
        assert!(AggregationSettings::new(5_000, 300, 72).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        for (delay, lag, lookback) in [
            (4_999, 30, 6),
            (60_000, 301, 6),
            (60_000, 30, 0),
            (60_000, 30, 73),
        ] {
            let result = AggregationSettings::new(delay, lag, lookback);

            assert!(
                matches!(result, Err(DomainError::Validation(_))),
                "expected rejection for ({delay}, {lag}, {lookback})"
            );
        }
    }
}
