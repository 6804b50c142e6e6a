//! Routes for the Ingestion context.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use shopstream_ingestion::application::command_handlers::{self, IngestReceipt};
use shopstream_ingestion::domain::commands::{EventDraft, IngestBatch, IngestEvent};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /batch.
#[derive(Debug, Deserialize)]
pub struct IngestBatchRequest {
    /// Events to store together.
    pub events: Vec<EventDraft>,
}

/// POST /
#[instrument(skip(state, request), fields(event_type = %request.event_type))]
async fn ingest_event(
    State(state): State<AppState>,
    Json(request): Json<EventDraft>,
) -> Result<(StatusCode, Json<IngestReceipt>), ApiError> {
    let command = IngestEvent {
        correlation_id: Uuid::new_v4(),
        draft: request,
    };

    info!(correlation_id = %command.correlation_id, "handling ingest_event command");

    let receipt = command_handlers::handle_ingest_event(
        command,
        state.clock.as_ref(),
        &*state.event_store,
    )
    .await?;

    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

/// POST /batch
#[instrument(skip(state, request), fields(size = request.events.len()))]
async fn ingest_batch(
    State(state): State<AppState>,
    Json(request): Json<IngestBatchRequest>,
) -> Result<(StatusCode, Json<IngestReceipt>), ApiError> {
    let command = IngestBatch {
        correlation_id: Uuid::new_v4(),
        drafts: request.events,
    };

    info!(correlation_id = %command.correlation_id, "handling ingest_batch command");

    let receipt = command_handlers::handle_ingest_batch(
        command,
        state.clock.as_ref(),
        &*state.event_store,
    )
    .await?;

    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

/// Returns the router for the ingestion context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(ingest_event))
        .route("/batch", post(ingest_batch))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use shopstream_core::event::EventType;
    use shopstream_test_support::{InMemoryAnalyticsStore, StaticCatalog, at};
    use tower::ServiceExt;

    use crate::routes::test_state;

    async fn post(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ingest_event_returns_202_and_stores_normalized_event() {
        // Arrange
        let store = InMemoryAnalyticsStore::new(at(0, 0, 0));
        let app = router().with_state(test_state::with(&store, StaticCatalog::default()));
        let body = serde_json::json!({
            "event_type": " view ",
            "session_id": "s-1",
            "product_id": 42,
            "metadata": { "brandId": 7 }
        });

        // Act
        let (status, json) = post(app, "/", &body).await;

        // Assert
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(json["accepted"], 1);
        let stored = store.events();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].event_type, EventType::ProductView);
        assert_eq!(stored[0].product_id, Some(42));
        assert_eq!(stored[0].occurred_at, at(10, 0, 0));
    }

    #[tokio::test]
    async fn test_redelivered_event_is_accepted_zero_times() {
        // Arrange
        let store = InMemoryAnalyticsStore::new(at(0, 0, 0));
        let state = test_state::with(&store, StaticCatalog::default());
        let body = serde_json::json!({
            "event_id": Uuid::new_v4(),
            "event_type": "ADD_TO_CART",
            "session_id": "s-1"
        });

        // Act
        let (_, first) = post(router().with_state(state.clone()), "/", &body).await;
        let (status, second) = post(router().with_state(state), "/", &body).await;

        // Assert
        assert_eq!(first["accepted"], 1);
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(second["accepted"], 0);
        assert_eq!(store.events().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_event_type_returns_400() {
        // Arrange
        let store = InMemoryAnalyticsStore::new(at(0, 0, 0));
        let app = router().with_state(test_state::with(&store, StaticCatalog::default()));
        let body = serde_json::json!({ "event_type": "HOVER", "session_id": "s-1" });

        // Act
        let (status, json) = post(app, "/", &body).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert!(store.events().is_empty());
    }

    #[tokio::test]
    async fn test_batch_with_one_invalid_event_stores_nothing() {
        // Arrange
        let store = InMemoryAnalyticsStore::new(at(0, 0, 0));
        let app = router().with_state(test_state::with(&store, StaticCatalog::default()));
        let body = serde_json::json!({
            "events": [
                { "event_type": "PRODUCT_VIEW", "session_id": "s-1" },
                { "event_type": "PURCHASE" }
            ]
        });

        // Act
        let (status, json) = post(app, "/batch", &body).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("events[1]"));
        assert!(store.events().is_empty());
    }

    #[tokio::test]
    async fn test_batch_returns_202_with_accepted_count() {
        // Arrange
        let store = InMemoryAnalyticsStore::new(at(0, 0, 0));
        let app = router().with_state(test_state::with(&store, StaticCatalog::default()));
        let body = serde_json::json!({
            "events": [
                { "event_type": "PRODUCT_VIEW", "session_id": "s-1", "product_id": 1 },
                { "event_type": "ADD_TO_CART", "session_id": "s-1", "product_id": 1 },
                { "event_type": "START_CHECKOUT", "session_id": "s-1" }
            ]
        });

        // Act
        let (status, json) = post(app, "/batch", &body).await;

        // Assert
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(json["accepted"], 3);
    }

    #[tokio::test]
    async fn test_empty_batch_returns_400() {
        // Arrange
        let store = InMemoryAnalyticsStore::new(at(0, 0, 0));
        let app = router().with_state(test_state::with(&store, StaticCatalog::default()));

        // Act
        let (status, _) = post(app, "/batch", &serde_json::json!({ "events": [] })).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ingest_event_returns_500_when_store_fails() {
        // Arrange
        let app = router().with_state(test_state::failing());
        let body = serde_json::json!({ "event_type": "SEARCH", "session_id": "s-1" });

        // Act
        let (status, json) = post(app, "/", &body).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }
}
