//! Shared application state.

use std::sync::Arc;

use shopstream_aggregation::domain::settings::AggregationSettings;
use shopstream_core::clock::Clock;
use shopstream_core::repository::{AggregationStore, EventStore, MetricsStore, ProductCatalog};
use shopstream_event_store::pg_aggregation_store::PgAggregationStore;
use shopstream_event_store::pg_catalog::PgProductCatalog;
use shopstream_event_store::pg_event_store::PgEventStore;
use shopstream_event_store::pg_metrics_store::PgMetricsStore;
use sqlx::PgPool;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for defaults and windows.
    pub clock: Arc<dyn Clock>,
    /// Raw event log.
    pub event_store: Arc<dyn EventStore>,
    /// Hourly rollups.
    pub metrics_store: Arc<dyn MetricsStore>,
    /// Aggregation lease and bucket writer.
    pub aggregation_store: Arc<dyn AggregationStore>,
    /// Product and brand catalog.
    pub catalog: Arc<dyn ProductCatalog>,
    /// Lag and lookback used by manual aggregation runs.
    pub aggregation: AggregationSettings,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_store: Arc<dyn EventStore>,
        metrics_store: Arc<dyn MetricsStore>,
        aggregation_store: Arc<dyn AggregationStore>,
        catalog: Arc<dyn ProductCatalog>,
        aggregation: AggregationSettings,
    ) -> Self {
        Self {
            clock,
            event_store,
            metrics_store,
            aggregation_store,
            catalog,
            aggregation,
        }
    }

    /// Create state backed by `PostgreSQL` adapters sharing `pool`.
    #[must_use]
    pub fn postgres(pool: PgPool, clock: Arc<dyn Clock>, aggregation: AggregationSettings) -> Self {
        Self::new(
            clock,
            Arc::new(PgEventStore::new(pool.clone())),
            Arc::new(PgMetricsStore::new(pool.clone())),
            Arc::new(PgAggregationStore::new(pool.clone())),
            Arc::new(PgProductCatalog::new(pool)),
            aggregation,
        )
    }
}
