//! Event normalization rules.

use chrono::{DateTime, Utc};
use shopstream_core::error::DomainError;
use shopstream_core::event::{EventType, RawEvent};
use uuid::Uuid;

use super::commands::EventDraft;

/// Largest accepted batch.
pub const MAX_BATCH_SIZE: usize = 500;

const MAX_EVENT_TYPE_CHARS: usize = 64;
const MAX_SESSION_ID_CHARS: usize = 200;
const MAX_PAGE_URL_CHARS: usize = 1_024;
const MAX_SOURCE_CHARS: usize = 120;
const MAX_DEVICE_TYPE_CHARS: usize = 64;

fn check_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Trims an optional string; blank becomes `None`.
fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, DomainError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    check_length(field, trimmed, max)?;
    Ok(Some(trimmed.to_owned()))
}

fn metadata_object(
    value: Option<serde_json::Value>,
) -> Result<serde_json::Map<String, serde_json::Value>, DomainError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(serde_json::Map::new()),
        Some(serde_json::Value::Object(map)) => Ok(map),
        Some(_) => Err(DomainError::Validation(
            "metadata must be a JSON object".into(),
        )),
    }
}

/// Turns a draft into a storable event.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an unknown event type, a missing
/// session, an over-long field or non-object metadata.
pub fn normalize(draft: EventDraft, now: DateTime<Utc>) -> Result<RawEvent, DomainError> {
    check_length("event_type", draft.event_type.trim(), MAX_EVENT_TYPE_CHARS)?;
    let event_type: EventType = draft.event_type.parse()?;

    let session_id = draft
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DomainError::Validation("session_id is required".into()))?;
    check_length("session_id", session_id, MAX_SESSION_ID_CHARS)?;
    let session_id = session_id.to_owned();

    Ok(RawEvent {
        id: draft.event_id.unwrap_or_else(Uuid::new_v4),
        event_type,
        user_id: draft.user_id,
        session_id,
        product_id: draft.product_id,
        order_id: draft.order_id,
        page_url: optional_text("page_url", draft.page_url, MAX_PAGE_URL_CHARS)?,
        source: optional_text("source", draft.source, MAX_SOURCE_CHARS)?,
        device_type: optional_text("device_type", draft.device_type, MAX_DEVICE_TYPE_CHARS)?,
        occurred_at: draft.occurred_at.unwrap_or(now),
        metadata: metadata_object(draft.metadata)?,
    })
}

/// Normalizes a whole batch before anything is written.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the batch is empty, larger than
/// [`MAX_BATCH_SIZE`], or if any event is invalid. The message names the
/// offending position.
pub fn normalize_batch(
    drafts: Vec<EventDraft>,
    now: DateTime<Utc>,
) -> Result<Vec<RawEvent>, DomainError> {
    if drafts.is_empty() {
        return Err(DomainError::Validation("events must not be empty".into()));
    }
    if drafts.len() > MAX_BATCH_SIZE {
        return Err(DomainError::Validation(format!(
            "events must contain at most {MAX_BATCH_SIZE} items, got {}",
            drafts.len()
        )));
    }

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            normalize(draft, now).map_err(|e| match e {
                DomainError::Validation(message) => {
                    DomainError::Validation(format!("events[{index}]: {message}"))
                }
                other => other,
            })
        })
        .collect()
}
