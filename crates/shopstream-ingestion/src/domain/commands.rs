//! Commands for the Ingestion context.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// One event as submitted by a producer, before normalization.
///
/// Every field may be missing on the wire; the
/// normalizer decides which omissions are defaults and which are errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    /// Producer-assigned id; generated when absent.
    pub event_id: Option<Uuid>,
    /// Event kind, case-insensitive.
    #[serde(default)]
    pub event_type: String,
    /// Signed-in user, if any.
    pub user_id: Option<i64>,
    /// Browser or app session.
    pub session_id: Option<String>,
    /// Product the event is about.
    pub product_id: Option<i32>,
    /// Order the event belongs to.
    pub order_id: Option<i64>,
    /// Page the event fired on.
    pub page_url: Option<String>,
    /// Traffic source or campaign.
    pub source: Option<String>,
    /// Client device class.
    pub device_type: Option<String>,
    /// When the event happened; defaults to ingestion time.
    pub occurred_at: Option<DateTime<Utc>>,
    /// Free-form attributes; must be a JSON object when present.
    pub metadata: Option<serde_json::Value>,
}

/// Command to ingest a single event.
#[derive(Debug, Clone)]
pub struct IngestEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submitted event.
    pub draft: EventDraft,
}

/// Command to ingest a batch of events all-or-nothing.
#[derive(Debug, Clone)]
pub struct IngestBatch {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submitted events.
    pub drafts: Vec<EventDraft>,
}
