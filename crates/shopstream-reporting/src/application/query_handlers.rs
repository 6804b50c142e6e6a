//! Query handlers for the Reporting context.

use chrono::{DateTime, TimeDelta, Utc};
use shopstream_core::clock::Clock;
use shopstream_core::error::DomainError;
use shopstream_core::query::{ReportWindow, clamp_limit};
use shopstream_core::repository::MetricsStore;
use tracing::instrument;

use crate::domain::funnel::{FunnelReport, build_funnel};
use crate::domain::top_products::{ProductMetrics, rank_products};

/// Window length in days when the caller gives no `from`.
pub const DEFAULT_REPORT_SPAN_DAYS: i64 = 7;

/// Parameters of the funnel report.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunnelQuery {
    /// Inclusive start; defaults to `to - 7d`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive end; defaults to now.
    pub to: Option<DateTime<Utc>>,
}

/// Parameters of the top-products report.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopProductsQuery {
    /// Inclusive start; defaults to `to - 7d`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive end; defaults to now.
    pub to: Option<DateTime<Utc>>,
    /// Requested size, clamped to `[1, 100]`.
    pub limit: Option<i64>,
}

/// Builds the purchase funnel over published buckets.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `to <= from`, or the store's error.
#[instrument(skip(clock, metrics))]
pub async fn get_funnel(
    query: FunnelQuery,
    clock: &dyn Clock,
    metrics: &dyn MetricsStore,
) -> Result<FunnelReport, DomainError> {
    let window = ReportWindow::resolve(
        query.from,
        query.to,
        TimeDelta::days(DEFAULT_REPORT_SPAN_DAYS),
        clock.now(),
    )?;
    let buckets = metrics.load_buckets(window.from, window.to).await?;
    Ok(build_funnel(window, &buckets))
}

/// Ranks products by commerce activity over published buckets.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `to <= from`, or the store's error.
#[instrument(skip(clock, metrics))]
pub async fn get_top_products(
    query: TopProductsQuery,
    clock: &dyn Clock,
    metrics: &dyn MetricsStore,
) -> Result<Vec<ProductMetrics>, DomainError> {
    let window = ReportWindow::resolve(
        query.from,
        query.to,
        TimeDelta::days(DEFAULT_REPORT_SPAN_DAYS),
        clock.now(),
    )?;
    let buckets = metrics.load_buckets(window.from, window.to).await?;
    Ok(rank_products(&buckets, clamp_limit(query.limit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopstream_core::event::EventType;
    use shopstream_core::metrics::AggregatedBucket;
    use shopstream_test_support::{FailingStore, FixedClock, InMemoryAnalyticsStore, at};

    fn bucket(
        bucket_start: DateTime<Utc>,
        event_type: EventType,
        product_key: i32,
        total: i64,
    ) -> AggregatedBucket {
        AggregatedBucket {
            bucket_start,
            event_type,
            product_key,
            total_events: total,
            unique_sessions: total,
            unique_users: 0,
            updated_at: bucket_start,
        }
    }

    fn seeded_store() -> InMemoryAnalyticsStore {
        let store = InMemoryAnalyticsStore::new(at(0, 0, 0));
        store.seed_buckets(
            (1..=150)
                .map(|product| {
                    bucket(
                        at(10, 0, 0),
                        EventType::ProductView,
                        product,
                        i64::from(product),
                    )
                })
                .chain([
                    bucket(at(10, 0, 0), EventType::AddToCart, 1, 4),
                    bucket(at(10, 0, 0), EventType::Purchase, 1, 2),
                    bucket(at(3, 0, 0), EventType::Purchase, 2, 50),
                ])
                .collect(),
        );
        store
    }

    #[tokio::test]
    async fn test_funnel_reads_only_buckets_in_window() {
        // Arrange
        let store = seeded_store();
        let query = FunnelQuery {
            from: Some(at(9, 0, 0)),
            to: Some(at(11, 0, 0)),
        };

        // Act
        let report = get_funnel(query, &FixedClock(at(12, 0, 0)), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(report.from, at(9, 0, 0));
        assert_eq!(report.steps[3].count, 2);
    }

    #[tokio::test]
    async fn test_funnel_defaults_to_trailing_week() {
        let store = seeded_store();

        let report = get_funnel(FunnelQuery::default(), &FixedClock(at(12, 0, 0)), &store)
            .await
            .unwrap();

        assert_eq!(report.to, at(12, 0, 0));
        assert_eq!(report.from, at(12, 0, 0) - TimeDelta::days(7));
        assert_eq!(report.steps[3].count, 52);
    }

    #[tokio::test]
    async fn test_inverted_window_is_rejected() {
        let store = seeded_store();
        let query = FunnelQuery {
            from: Some(at(11, 0, 0)),
            to: Some(at(11, 0, 0)),
        };

        let result = get_funnel(query, &FixedClock(at(12, 0, 0)), &store).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_top_products_clamps_limit() {
        let store = seeded_store();
        let clock = FixedClock(at(12, 0, 0));

        let huge = get_top_products(
            TopProductsQuery {
                limit: Some(500),
                ..TopProductsQuery::default()
            },
            &clock,
            &store,
        )
        .await
        .unwrap();
        let zero = get_top_products(
            TopProductsQuery {
                limit: Some(0),
                ..TopProductsQuery::default()
            },
            &clock,
            &store,
        )
        .await
        .unwrap();

        assert_eq!(huge.len(), 100);
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].product_id, 2);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let result = get_top_products(
            TopProductsQuery::default(),
            &FixedClock(at(12, 0, 0)),
            &FailingStore,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
