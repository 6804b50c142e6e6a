//! Route modules organized by bounded context.

pub mod admin;
pub mod analytics;
pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Assembles every route under its public prefix.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/events", events::router())
        .nest("/api/v1/analytics", analytics::router())
        .nest("/api/v1/admin", admin::router())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_state {
    use std::sync::Arc;

    use shopstream_aggregation::domain::settings::AggregationSettings;
    use shopstream_core::clock::Clock;
    use shopstream_test_support::{
        FailingStore, FixedClock, InMemoryAnalyticsStore, StaticCatalog, at,
    };

    use crate::state::AppState;

    /// State over `store` and `catalog` with the clock fixed at 10:00.
    pub(crate) fn with(store: &InMemoryAnalyticsStore, catalog: StaticCatalog) -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(at(10, 0, 0)));
        AppState::new(
            clock,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(catalog),
            AggregationSettings::default(),
        )
    }

    /// State whose every store call fails.
    pub(crate) fn failing() -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(at(10, 0, 0)));
        AppState::new(
            clock,
            Arc::new(FailingStore),
            Arc::new(FailingStore),
            Arc::new(FailingStore),
            Arc::new(FailingStore),
            AggregationSettings::default(),
        )
    }
}
