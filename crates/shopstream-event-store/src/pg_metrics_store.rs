//! `PostgreSQL` implementation of the `MetricsStore` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopstream_core::error::DomainError;
use shopstream_core::metrics::AggregatedBucket;
use shopstream_core::repository::MetricsStore;

use crate::{infrastructure, stored_event_type};

const LOAD_BUCKETS_SQL: &str = r"
SELECT bucket_start, event_type, product_key, total_events,
       unique_sessions, unique_users, updated_at
FROM analytics_event_metrics_hourly
WHERE bucket_start >= $1 AND bucket_start <= $2
ORDER BY bucket_start, event_type, product_key
";

/// Row shape of `analytics_event_metrics_hourly`.
#[derive(Debug, sqlx::FromRow)]
struct BucketRow {
    bucket_start: DateTime<Utc>,
    event_type: String,
    product_key: i32,
    total_events: i64,
    unique_sessions: i64,
    unique_users: i64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BucketRow> for AggregatedBucket {
    type Error = DomainError;

    fn try_from(row: BucketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            bucket_start: row.bucket_start,
            event_type: stored_event_type(&row.event_type)?,
            product_key: row.product_key,
            total_events: row.total_events,
            unique_sessions: row.unique_sessions,
            unique_users: row.unique_users,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed hourly metrics reader.
#[derive(Debug, Clone)]
pub struct PgMetricsStore {
    pool: PgPool,
}

impl PgMetricsStore {
    /// Creates a new `PgMetricsStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricsStore for PgMetricsStore {
    async fn load_buckets(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedBucket>, DomainError> {
        let rows: Vec<BucketRow> = sqlx::query_as(LOAD_BUCKETS_SQL)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        rows.into_iter().map(AggregatedBucket::try_from).collect()
    }
}
