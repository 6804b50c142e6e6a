//! Shopstream Event Store — `PostgreSQL` adapters for the core store traits.

pub mod pg_aggregation_store;
pub mod pg_catalog;
pub mod pg_event_store;
pub mod pg_metrics_store;
pub mod schema;

use shopstream_core::error::DomainError;
use shopstream_core::event::EventType;

/// Maps a driver error onto the core's store-unavailable error.
pub(crate) fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("database error: {err}"))
}

/// Parses an event type read back from a table column.
pub(crate) fn stored_event_type(raw: &str) -> Result<EventType, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::Infrastructure(format!("unknown stored event type: {raw}")))
}
