//! Command handlers for the Ingestion context.
//!
//! Each handler normalizes its input completely before touching the store,
//! so a rejected request never leaves a partial write behind.

use serde::Serialize;
use shopstream_core::clock::Clock;
use shopstream_core::error::DomainError;
use shopstream_core::repository::EventStore;
use tracing::{debug, instrument};

use crate::domain::commands::{IngestBatch, IngestEvent};
use crate::domain::normalize::{normalize, normalize_batch};

/// How many submitted events were newly stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    /// Events stored by this call; redelivered ids are not counted.
    pub accepted: u64,
}

/// Handles the `IngestEvent` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the event is invalid, or the store's
/// error if the insert fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_ingest_event(
    command: IngestEvent,
    clock: &dyn Clock,
    store: &dyn EventStore,
) -> Result<IngestReceipt, DomainError> {
    let event = normalize(command.draft, clock.now())?;
    let accepted = store.insert_events(std::slice::from_ref(&event)).await?;
    debug!(event_id = %event.id, event_type = %event.event_type, accepted, "event ingested");
    Ok(IngestReceipt { accepted })
}

/// Handles the `IngestBatch` command. The batch is accepted or rejected as
/// a whole.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the batch size is out of range or
/// any event is invalid, or the store's error if the insert fails.
#[instrument(
    skip_all,
    fields(correlation_id = %command.correlation_id, size = command.drafts.len())
)]
pub async fn handle_ingest_batch(
    command: IngestBatch,
    clock: &dyn Clock,
    store: &dyn EventStore,
) -> Result<IngestReceipt, DomainError> {
    let events = normalize_batch(command.drafts, clock.now())?;
    let accepted = store.insert_events(&events).await?;
    debug!(submitted = events.len(), accepted, "batch ingested");
    Ok(IngestReceipt { accepted })
}
