//! Aggregation window planning.

use chrono::{DateTime, TimeDelta, Utc};
use shopstream_core::time::{floor_to_hour, floor_to_second};

/// The half-open event range `[from, upper_bound)` one run re-aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationWindow {
    /// Hour-aligned inclusive start.
    pub from: DateTime<Utc>,
    /// Exclusive end; becomes the new watermark.
    pub upper_bound: DateTime<Utc>,
}

impl AggregationWindow {
    /// Computes the run's upper bound: `now - lag`, truncated to the second.
    /// The lag keeps events still in flight at the source out of the run.
    #[must_use]
    pub fn upper_bound(now: DateTime<Utc>, lag: TimeDelta) -> DateTime<Utc> {
        floor_to_second(now - lag)
    }

    /// Plans the window for a run that observed `last_processed_at`.
    ///
    /// The start is the earlier of the watermark and `upper_bound - lookback`,
    /// floored to the hour. Returns `None` when there is nothing to cover.
    #[must_use]
    pub fn plan(
        upper_bound: DateTime<Utc>,
        last_processed_at: DateTime<Utc>,
        lookback: TimeDelta,
    ) -> Option<Self> {
        let lookback_start = upper_bound - lookback;
        let from = floor_to_hour(last_processed_at.min(lookback_start));
        if upper_bound <= from {
            return None;
        }
        Some(Self { from, upper_bound })
    }

    /// First bucket hour replaced by this run.
    #[must_use]
    pub fn first_hour(&self) -> DateTime<Utc> {
        floor_to_hour(self.from)
    }

    /// Last bucket hour replaced by this run (inclusive). The bucket holding
    /// `upper_bound` is rewritten with its partial count.
    #[must_use]
    pub fn last_hour(&self) -> DateTime<Utc> {
        floor_to_hour(self.upper_bound)
    }
}
