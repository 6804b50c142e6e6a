//! `PostgreSQL` implementation of the `AggregationStore` trait.
//!
//! The lease is a row lock: each unit opens a transaction and reads the
//! single watermark row with `SELECT ... FOR UPDATE`. A second instance (or
//! an overlapping tick) blocks on that read until the first transaction
//! commits or rolls back, then sees the advanced watermark.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use shopstream_core::error::DomainError;
use shopstream_core::event::EventFact;
use shopstream_core::metrics::AggregatedBucket;
use shopstream_core::repository::{AggregationStore, AggregationUnit};

use crate::{infrastructure, stored_event_type};

const LOCK_STATE_SQL: &str =
    "SELECT last_processed_at FROM analytics_aggregation_state WHERE id = 1 FOR UPDATE";

const UPDATE_STATE_SQL: &str =
    "UPDATE analytics_aggregation_state SET last_processed_at = $1 WHERE id = 1";

const LOAD_FACTS_SQL: &str = r"
SELECT occurred_at, event_type, product_id, session_id, user_id
FROM analytics_events_raw
WHERE occurred_at >= $1 AND occurred_at < $2
";

const DELETE_RANGE_SQL: &str = r"
DELETE FROM analytics_event_metrics_hourly
WHERE bucket_start >= $1 AND bucket_start <= $2
";

const INSERT_BUCKETS_SQL: &str = "INSERT INTO analytics_event_metrics_hourly \
    (bucket_start, event_type, product_key, total_events, \
    unique_sessions, unique_users, updated_at) ";

/// Rows per multi-row insert; 7 binds each keeps a statement under the
/// 65535 bind parameter limit.
const INSERT_CHUNK_ROWS: usize = 1_000;

#[derive(Debug, sqlx::FromRow)]
struct FactRow {
    occurred_at: DateTime<Utc>,
    event_type: String,
    product_id: Option<i32>,
    session_id: String,
    user_id: Option<i64>,
}

impl TryFrom<FactRow> for EventFact {
    type Error = DomainError;

    fn try_from(row: FactRow) -> Result<Self, Self::Error> {
        Ok(Self {
            occurred_at: row.occurred_at,
            event_type: stored_event_type(&row.event_type)?,
            product_id: row.product_id,
            session_id: row.session_id,
            user_id: row.user_id,
        })
    }
}

/// PostgreSQL-backed aggregation lease and bucket writer.
#[derive(Debug, Clone)]
pub struct PgAggregationStore {
    pool: PgPool,
}

impl PgAggregationStore {
    /// Creates a new `PgAggregationStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregationStore for PgAggregationStore {
    async fn begin(&self) -> Result<Box<dyn AggregationUnit>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;
        let (last_processed_at,): (DateTime<Utc>,) = sqlx::query_as(LOCK_STATE_SQL)
            .fetch_one(&mut *tx)
            .await
            .map_err(infrastructure)?;

        Ok(Box::new(PgAggregationUnit {
            tx,
            last_processed_at,
        }))
    }
}

/// An open aggregation transaction holding the watermark row lock.
///
/// Dropping it without `commit` rolls the transaction back.
pub struct PgAggregationUnit {
    tx: Transaction<'static, Postgres>,
    last_processed_at: DateTime<Utc>,
}

#[async_trait]
impl AggregationUnit for PgAggregationUnit {
    fn last_processed_at(&self) -> DateTime<Utc> {
        self.last_processed_at
    }

    async fn load_facts(
        &mut self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventFact>, DomainError> {
        let rows: Vec<FactRow> = sqlx::query_as(LOAD_FACTS_SQL)
            .bind(from)
            .bind(to)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(infrastructure)?;

        rows.into_iter().map(EventFact::try_from).collect()
    }

    async fn replace_buckets(
        &mut self,
        first_hour: DateTime<Utc>,
        last_hour: DateTime<Utc>,
        buckets: &[AggregatedBucket],
    ) -> Result<(), DomainError> {
        sqlx::query(DELETE_RANGE_SQL)
            .bind(first_hour)
            .bind(last_hour)
            .execute(&mut *self.tx)
            .await
            .map_err(infrastructure)?;

        for chunk in buckets.chunks(INSERT_CHUNK_ROWS) {
            let mut insert = QueryBuilder::<Postgres>::new(INSERT_BUCKETS_SQL);
            insert.push_values(chunk, |mut row, bucket| {
                row.push_bind(bucket.bucket_start)
                    .push_bind(bucket.event_type.as_str())
                    .push_bind(bucket.product_key)
                    .push_bind(bucket.total_events)
                    .push_bind(bucket.unique_sessions)
                    .push_bind(bucket.unique_users)
                    .push_bind(bucket.updated_at);
            });
            insert
                .build()
                .execute(&mut *self.tx)
                .await
                .map_err(infrastructure)?;
        }
        Ok(())
    }

    async fn set_last_processed_at(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query(UPDATE_STATE_SQL)
            .bind(at)
            .execute(&mut *self.tx)
            .await
            .map_err(infrastructure)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx.commit().await.map_err(infrastructure)
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx.rollback().await.map_err(infrastructure)
    }
}
