//! Behavior event model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The closed set of behavior events the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A product detail page was viewed.
    ProductView,
    /// A product was added to the cart.
    AddToCart,
    /// A product was removed from the cart.
    RemoveFromCart,
    /// Checkout was started.
    StartCheckout,
    /// An order was placed.
    Purchase,
    /// A catalog search was run.
    Search,
    /// A product was added to favorites.
    FavoriteAdd,
    /// A brand link or tile was clicked.
    BrandClick,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::ProductView,
        Self::AddToCart,
        Self::RemoveFromCart,
        Self::StartCheckout,
        Self::Purchase,
        Self::Search,
        Self::FavoriteAdd,
        Self::BrandClick,
    ];

    /// Returns the stored wire name of this event type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProductView => "PRODUCT_VIEW",
            Self::AddToCart => "ADD_TO_CART",
            Self::RemoveFromCart => "REMOVE_FROM_CART",
            Self::StartCheckout => "START_CHECKOUT",
            Self::Purchase => "PURCHASE",
            Self::Search => "SEARCH",
            Self::FavoriteAdd => "FAVORITE_ADD",
            Self::BrandClick => "BRAND_CLICK",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    /// Parses an event type case-insensitively, ignoring surrounding
    /// whitespace. `VIEW` is accepted as an alias of `PRODUCT_VIEW`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized == "VIEW" {
            return Ok(Self::ProductView);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::Validation(format!("unsupported event type: {raw}")))
    }
}

/// A normalized behavior event as persisted in the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Unique event identifier; insertion is idempotent on it.
    pub id: Uuid,
    /// The event kind.
    pub event_type: EventType,
    /// Authenticated user, if any.
    pub user_id: Option<i64>,
    /// Browser or app session.
    pub session_id: String,
    /// Product the event is about, if any.
    pub product_id: Option<i32>,
    /// Order the event is about, if any.
    pub order_id: Option<i64>,
    /// Page the event was raised on.
    pub page_url: Option<String>,
    /// Traffic source label.
    pub source: Option<String>,
    /// Device class label.
    pub device_type: Option<String>,
    /// When the event happened at the source.
    pub occurred_at: DateTime<Utc>,
    /// Opaque key-value payload.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl RawEvent {
    /// Returns the explicit brand hint carried in metadata, if any.
    #[must_use]
    pub fn brand_hint(&self) -> Option<i32> {
        match self.metadata.get("brandId")? {
            serde_json::Value::String(text) => parse_brand_hint(text),
            serde_json::Value::Number(number) => parse_brand_hint(&number.to_string()),
            _ => None,
        }
    }
}

/// Parses a `brandId` metadata value: ASCII digits only, fitting in `i32`.
#[must_use]
pub fn parse_brand_hint(text: &str) -> Option<i32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// The columns of a raw event that hourly rollups are computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFact {
    /// When the event happened.
    pub occurred_at: DateTime<Utc>,
    /// The event kind.
    pub event_type: EventType,
    /// Product the event is about, if any.
    pub product_id: Option<i32>,
    /// Session the event belongs to.
    pub session_id: String,
    /// User the event belongs to, if any.
    pub user_id: Option<i64>,
}

impl From<&RawEvent> for EventFact {
    fn from(event: &RawEvent) -> Self {
        Self {
            occurred_at: event.occurred_at,
            event_type: event.event_type,
            product_id: event.product_id,
            session_id: event.session_id.clone(),
            user_id: event.user_id,
        }
    }
}

/// The columns of a raw event that scoring and brand rankings read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringEvent {
    /// The event kind.
    pub event_type: EventType,
    /// Product the event is about, if any.
    pub product_id: Option<i32>,
    /// Brand hint from metadata, used when no product is attached.
    pub brand_hint: Option<i32>,
}

impl From<&RawEvent> for ScoringEvent {
    fn from(event: &RawEvent) -> Self {
        Self {
            event_type: event.event_type,
            product_id: event.product_id,
            brand_hint: event.brand_hint(),
        }
    }
}

/// Whose behavior a personalized query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerIdentity {
    /// A signed-in user.
    User(i64),
    /// An anonymous session.
    Session(String),
}

impl ViewerIdentity {
    /// Resolves the identity, preferring the user over the session. Blank
    /// session ids are ignored.
    #[must_use]
    pub fn resolve(user_id: Option<i64>, session_id: Option<&str>) -> Option<Self> {
        if let Some(user_id) = user_id {
            return Some(Self::User(user_id));
        }
        session_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Self::Session(s.to_owned()))
    }

    /// Returns true when `event` belongs to this viewer.
    #[must_use]
    pub fn owns(&self, event: &RawEvent) -> bool {
        match self {
            Self::User(user_id) => event.user_id == Some(*user_id),
            Self::Session(session_id) => event.session_id == *session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_with_metadata(metadata: serde_json::Value) -> RawEvent {
        RawEvent {
            id: Uuid::new_v4(),
            event_type: EventType::BrandClick,
            user_id: None,
            session_id: "s-1".to_owned(),
            product_id: None,
            order_id: None,
            page_url: None,
            source: None,
            device_type: None,
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            metadata: metadata.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_event_type_parses_case_insensitively_and_trimmed() {
        assert_eq!(
            " add_to_cart ".parse::<EventType>().unwrap(),
            EventType::AddToCart
        );
        assert_eq!(
            "Purchase".parse::<EventType>().unwrap(),
            EventType::Purchase
        );
        assert_eq!("view".parse::<EventType>().unwrap(), EventType::ProductView);
    }

    #[test]
    fn test_event_type_rejects_unknown_kind() {
        match "CHECKOUT_DONE".parse::<EventType>() {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("CHECKOUT_DONE")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_event_type_wire_names_round_trip() {
        for kind in EventType::ALL {
            assert_eq!(kind.as_str().parse::<EventType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_brand_hint_accepts_digit_strings_and_numbers() {
        assert_eq!(
            event_with_metadata(serde_json::json!({"brandId": "42"})).brand_hint(),
            Some(42)
        );
        assert_eq!(
            event_with_metadata(serde_json::json!({"brandId": 7})).brand_hint(),
            Some(7)
        );
    }

    #[test]
    fn test_brand_hint_rejects_non_numeric_values() {
        for value in [
            serde_json::json!({"brandId": "-3"}),
            serde_json::json!({"brandId": "12a"}),
            serde_json::json!({"brandId": 1.5}),
            serde_json::json!({"brandId": "99999999999"}),
            serde_json::json!({"brandId": null}),
            serde_json::json!({}),
        ] {
            assert_eq!(event_with_metadata(value).brand_hint(), None);
        }
    }

    #[test]
    fn test_viewer_identity_prefers_user_over_session() {
        assert_eq!(
            ViewerIdentity::resolve(Some(5), Some("abc")),
            Some(ViewerIdentity::User(5))
        );
        assert_eq!(
            ViewerIdentity::resolve(None, Some(" abc ")),
            Some(ViewerIdentity::Session("abc".to_owned()))
        );
        assert_eq!(ViewerIdentity::resolve(None, Some("   ")), None);
        assert_eq!(ViewerIdentity::resolve(None, None), None);
    }
}
