//! Event and timestamp builders for tests.

use chrono::{DateTime, TimeZone, Utc};
use shopstream_core::event::{EventType, RawEvent};
use uuid::Uuid;

/// Builds a UTC timestamp on 2026-01-15.
///
/// # Panics
///
/// Panics if the components do not form a valid time of day.
#[must_use]
pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, second)
        .single()
        .expect("valid fixture timestamp")
}

/// Builds an anonymous event for `session_id` with a fresh id and empty
/// metadata. Tweak the returned value for users, products or metadata.
#[must_use]
pub fn event(event_type: EventType, session_id: &str, occurred_at: DateTime<Utc>) -> RawEvent {
    RawEvent {
        id: Uuid::new_v4(),
        event_type,
        user_id: None,
        session_id: session_id.to_owned(),
        product_id: None,
        order_id: None,
        page_url: None,
        source: None,
        device_type: None,
        occurred_at,
        metadata: serde_json::Map::new(),
    }
}
