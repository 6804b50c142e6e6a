//! Query handlers for the Recommendation context.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use shopstream_core::clock::Clock;
use shopstream_core::error::DomainError;
use shopstream_core::event::ViewerIdentity;
use shopstream_core::query::{ReportWindow, clamp_limit};
use shopstream_core::repository::{EventStore, MetricsStore, ProductCatalog};
use shopstream_core::time::floor_to_second;
use tracing::{debug, instrument};

use crate::domain::brands::{BrandMetrics, rank_brands};
use crate::domain::ranking::{Eligibility, ScoredProduct, rank_candidates};
use crate::domain::signals::{
    BrandResolver, Signals, affinity_signal, direct_signal, global_signal,
};

/// Days of viewer history behind the personal signals.
pub const VIEWER_HISTORY_DAYS: i64 = 180;
/// Days of rollups behind the global-trend signal.
pub const TREND_WINDOW_DAYS: i64 = 120;
/// Size of the personal top-brand list.
pub const PERSONAL_TOP_BRANDS: usize = 8;
/// Window length in days when a top-brands caller gives no `from`.
pub const DEFAULT_BRAND_SPAN_DAYS: i64 = 30;

/// Parameters of a recommendation request.
#[derive(Debug, Clone, Default)]
pub struct RecommendationQuery {
    /// Signed-in viewer; wins over `session_id`.
    pub user_id: Option<i64>,
    /// Anonymous viewer session.
    pub session_id: Option<String>,
    /// Restrict candidates to one category.
    pub category_id: Option<i32>,
    /// Products never to return.
    pub exclude_product_ids: Vec<i32>,
    /// Requested size, clamped to `[1, 100]`.
    pub limit: Option<i64>,
    /// Tie-break seed; defaults to the current epoch second.
    pub seed: Option<String>,
}

/// Ranked products plus the viewer's favourite brands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    /// Clock time the ranking was computed at, whole seconds.
    pub generated_at: DateTime<Utc>,
    /// Ranked products.
    pub items: Vec<ScoredProduct>,
    /// The viewer's top brands.
    pub top_brands: Vec<BrandMetrics>,
}

/// Parameters of the global top-brands report.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopBrandsQuery {
    /// Inclusive start; defaults to `to - 30d`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive end; defaults to now.
    pub to: Option<DateTime<Utc>>,
    /// Requested size, clamped to `[1, 100]`.
    pub limit: Option<i64>,
}

/// Ranks catalog products for the viewer.
///
/// Without any viewer identity the personal signals are empty, so the
/// ranking falls back to global trend and `top_brands` is empty.
///
/// # Errors
///
/// Returns the first store or catalog error.
#[instrument(skip(clock, events, metrics, catalog))]
pub async fn get_recommendations(
    query: RecommendationQuery,
    clock: &dyn Clock,
    events: &dyn EventStore,
    metrics: &dyn MetricsStore,
    catalog: &dyn ProductCatalog,
) -> Result<Recommendations, DomainError> {
    let generated_at = floor_to_second(clock.now());
    let seed = query
        .seed
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| generated_at.timestamp().to_string(), str::to_owned);

    let products = catalog.list_products().await?;
    let resolver = BrandResolver::new(&products);

    let viewer = ViewerIdentity::resolve(query.user_id, query.session_id.as_deref());
    let viewer_events = match &viewer {
        Some(viewer) => {
            let since = generated_at - TimeDelta::days(VIEWER_HISTORY_DAYS);
            events.load_viewer_events(viewer, since).await?
        }
        None => Vec::new(),
    };
    let trend = metrics
        .load_buckets(
            generated_at - TimeDelta::days(TREND_WINDOW_DAYS),
            generated_at,
        )
        .await?;

    let signals = Signals {
        direct: direct_signal(&viewer_events),
        affinity: affinity_signal(&viewer_events, &resolver),
        global: global_signal(&trend),
    };
    let eligibility = Eligibility {
        category_id: query.category_id,
        excluded: &query.exclude_product_ids,
    };
    let items = rank_candidates(
        &products,
        &signals,
        &eligibility,
        &seed,
        clamp_limit(query.limit),
    );

    let top_brands = if viewer_events.is_empty() {
        Vec::new()
    } else {
        let brands = catalog.list_brands().await?;
        rank_brands(&viewer_events, &resolver, &brands, PERSONAL_TOP_BRANDS)
    };

    debug!(
        items = items.len(),
        viewer_events = viewer_events.len(),
        %seed,
        "recommendations ranked"
    );
    Ok(Recommendations {
        generated_at,
        items,
        top_brands,
    })
}

/// Ranks brands by engagement across all viewers in a window of raw events.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `to <= from`, or the first store or
/// catalog error.
#[instrument(skip(clock, events, catalog))]
pub async fn get_top_brands(
    query: TopBrandsQuery,
    clock: &dyn Clock,
    events: &dyn EventStore,
    catalog: &dyn ProductCatalog,
) -> Result<Vec<BrandMetrics>, DomainError> {
    let window = ReportWindow::resolve(
        query.from,
        query.to,
        TimeDelta::days(DEFAULT_BRAND_SPAN_DAYS),
        clock.now(),
    )?;
    let scoring_events = events.load_scoring_events(window.from, window.to).await?;
    let products = catalog.list_products().await?;
    let brands = catalog.list_brands().await?;

    Ok(rank_brands(
        &scoring_events,
        &BrandResolver::new(&products),
        &brands,
        clamp_limit(query.limit),
    ))
}
