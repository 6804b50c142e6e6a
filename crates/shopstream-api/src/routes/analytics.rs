//! Routes for the Reporting and Recommendation contexts.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use shopstream_core::query::parse_id_list;
use shopstream_recommendation::application::query_handlers::{
    self as recommendation, RecommendationQuery, Recommendations, TopBrandsQuery,
};
use shopstream_recommendation::domain::brands::BrandMetrics;
use shopstream_reporting::application::query_handlers::{
    self as reporting, FunnelQuery, TopProductsQuery,
};
use shopstream_reporting::domain::funnel::FunnelReport;
use shopstream_reporting::domain::top_products::ProductMetrics;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the windowed reports.
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    /// Inclusive start, RFC 3339.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive end, RFC 3339.
    pub to: Option<DateTime<Utc>>,
    /// Requested result size.
    pub limit: Option<i64>,
}

/// Query string of GET /recommendations.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    /// Signed-in viewer; wins over `session_id`.
    pub user_id: Option<i64>,
    /// Anonymous viewer session.
    pub session_id: Option<String>,
    /// Restricts candidates to one category.
    pub category_id: Option<i32>,
    /// Comma-separated product ids to leave out.
    pub exclude_product_ids: Option<String>,
    /// Requested result size.
    pub limit: Option<i64>,
    /// Tie-break seed; defaults to the request time.
    pub seed: Option<String>,
}

/// GET /funnel
#[instrument(skip(state))]
async fn funnel(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<FunnelReport>, ApiError> {
    let query = FunnelQuery {
        from: params.from,
        to: params.to,
    };
    let report =
        reporting::get_funnel(query, state.clock.as_ref(), &*state.metrics_store).await?;
    Ok(Json(report))
}

/// GET /top-products
#[instrument(skip(state))]
async fn top_products(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<ProductMetrics>>, ApiError> {
    let query = TopProductsQuery {
        from: params.from,
        to: params.to,
        limit: params.limit,
    };
    let products =
        reporting::get_top_products(query, state.clock.as_ref(), &*state.metrics_store).await?;
    Ok(Json(products))
}

/// GET /top-brands
#[instrument(skip(state))]
async fn top_brands(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<BrandMetrics>>, ApiError> {
    let query = TopBrandsQuery {
        from: params.from,
        to: params.to,
        limit: params.limit,
    };
    let brands = recommendation::get_top_brands(
        query,
        state.clock.as_ref(),
        &*state.event_store,
        &*state.catalog,
    )
    .await?;
    Ok(Json(brands))
}

/// GET /recommendations
#[instrument(skip(state))]
async fn recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> Result<Json<Recommendations>, ApiError> {
    let query = RecommendationQuery {
        user_id: params.user_id,
        session_id: params.session_id,
        category_id: params.category_id,
        exclude_product_ids: parse_id_list(params.exclude_product_ids.as_deref()),
        limit: params.limit,
        seed: params.seed,
    };
    let ranked = recommendation::get_recommendations(
        query,
        state.clock.as_ref(),
        &*state.event_store,
        &*state.metrics_store,
        &*state.catalog,
    )
    .await?;
    Ok(Json(ranked))
}

/// Returns the router for the analytics read side.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/funnel", get(funnel))
        .route("/top-products", get(top_products))
        .route("/top-brands", get(top_brands))
        .route("/recommendations", get(recommendations))
}
