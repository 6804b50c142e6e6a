//! Hourly rollup model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EventType;

/// Product key used for events that carry no product.
pub const NO_PRODUCT: i32 = 0;

/// One hourly, per-event-type, per-product rollup.
///
/// Keyed by `(bucket_start, event_type, product_key)`. Only counts are kept;
/// no raw identifiers survive aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedBucket {
    /// Start of the hour this bucket covers.
    pub bucket_start: DateTime<Utc>,
    /// The event kind counted.
    pub event_type: EventType,
    /// Product id, or [`NO_PRODUCT`].
    pub product_key: i32,
    /// Number of events.
    pub total_events: i64,
    /// Number of distinct sessions.
    pub unique_sessions: i64,
    /// Number of distinct signed-in users.
    pub unique_users: i64,
    /// When the bucket was last (re)computed.
    pub updated_at: DateTime<Utc>,
}

impl AggregatedBucket {
    /// Returns the key this bucket is stored under.
    #[must_use]
    pub fn key(&self) -> (DateTime<Utc>, EventType, i32) {
        (self.bucket_start, self.event_type, self.product_key)
    }

    /// Returns true when distinct counts do not exceed the raw count.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.unique_sessions <= self.total_events && self.unique_users <= self.total_events
    }
}
