//! `PostgreSQL` implementation of the `EventStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;

use shopstream_core::error::DomainError;
use shopstream_core::event::{RawEvent, ScoringEvent, ViewerIdentity, parse_brand_hint};
use shopstream_core::repository::EventStore;

use crate::{infrastructure, stored_event_type};

const INSERT_EVENT_SQL: &str = r"
INSERT INTO analytics_events_raw (
    id, event_type, user_id, session_id, product_id, order_id,
    page_url, source, device_type, occurred_at, metadata, created_at
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
ON CONFLICT (id) DO NOTHING
";

const USER_EVENTS_SQL: &str = r"
SELECT event_type, product_id, metadata->>'brandId' AS brand_hint
FROM analytics_events_raw
WHERE occurred_at >= $1 AND user_id = $2
";

const SESSION_EVENTS_SQL: &str = r"
SELECT event_type, product_id, metadata->>'brandId' AS brand_hint
FROM analytics_events_raw
WHERE occurred_at >= $1 AND session_id = $2
";

const WINDOW_EVENTS_SQL: &str = r"
SELECT event_type, product_id, metadata->>'brandId' AS brand_hint
FROM analytics_events_raw
WHERE occurred_at >= $1 AND occurred_at <= $2
";

#[derive(Debug, sqlx::FromRow)]
struct ScoringRow {
    event_type: String,
    product_id: Option<i32>,
    brand_hint: Option<String>,
}

impl TryFrom<ScoringRow> for ScoringEvent {
    type Error = DomainError;

    fn try_from(row: ScoringRow) -> Result<Self, Self::Error> {
        Ok(Self {
            event_type: stored_event_type(&row.event_type)?,
            product_id: row.product_id,
            brand_hint: row.brand_hint.as_deref().and_then(parse_brand_hint),
        })
    }
}

fn into_scoring_events(rows: Vec<ScoringRow>) -> Result<Vec<ScoringEvent>, DomainError> {
    rows.into_iter().map(ScoringEvent::try_from).collect()
}

/// PostgreSQL-backed raw event log.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Creates a new `PgEventStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert_events(&self, events: &[RawEvent]) -> Result<u64, DomainError> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(infrastructure)?;
        let mut accepted = 0;
        for event in events {
            let result = sqlx::query(INSERT_EVENT_SQL)
                .bind(event.id)
                .bind(event.event_type.as_str())
                .bind(event.user_id)
                .bind(&event.session_id)
                .bind(event.product_id)
                .bind(event.order_id)
                .bind(event.page_url.as_deref())
                .bind(event.source.as_deref())
                .bind(event.device_type.as_deref())
                .bind(event.occurred_at)
                .bind(Json(&event.metadata))
                .execute(&mut *tx)
                .await
                .map_err(infrastructure)?;
            accepted += result.rows_affected();
        }
        tx.commit().await.map_err(infrastructure)?;

        debug!(received = events.len(), accepted, "stored raw events");
        Ok(accepted)
    }

    async fn load_viewer_events(
        &self,
        viewer: &ViewerIdentity,
        since: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError> {
        let rows: Vec<ScoringRow> = match viewer {
            ViewerIdentity::User(user_id) => {
                sqlx::query_as(USER_EVENTS_SQL)
                    .bind(since)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await
            }
            ViewerIdentity::Session(session_id) => {
                sqlx::query_as(SESSION_EVENTS_SQL)
                    .bind(since)
                    .bind(session_id)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(infrastructure)?;

        into_scoring_events(rows)
    }

    async fn load_scoring_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError> {
        let rows: Vec<ScoringRow> = sqlx::query_as(WINDOW_EVENTS_SQL)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        into_scoring_events(rows)
    }
}
