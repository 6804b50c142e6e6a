//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use shopstream_aggregation::domain::settings::AggregationSettings;
use shopstream_core::clock::Clock;
use shopstream_test_support::{FixedClock, at};
use sqlx::PgPool;
use tower::ServiceExt;

use shopstream_api::routes;
use shopstream_api::state::AppState;

/// Build the full app router over `PostgreSQL` adapters with the clock fixed
/// at 2026-01-15T10:00:00Z. Uses the same route structure as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(at(10, 0, 0)));
    routes::build_router(AppState::postgres(pool, clock, AggregationSettings::default()))
}

/// Insert catalog rows directly; the service only ever reads them.
pub async fn seed_catalog(pool: &PgPool, brands: &[(i32, &str)], products: &[(i32, Option<i32>)]) {
    for (id, name) in brands {
        sqlx::query("INSERT INTO catalog_brands (id, name) VALUES ($1, $2)")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
    }
    for (id, brand_id) in products {
        sqlx::query("INSERT INTO catalog_products (id, brand_id) VALUES ($1, $2)")
            .bind(id)
            .bind(brand_id)
            .execute(pool)
            .await
            .unwrap();
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
