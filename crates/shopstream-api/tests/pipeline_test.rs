//! Integration tests for ingest, aggregation and the funnel reports.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

fn visit(event_type: &str, session_id: &str, product_id: i32, minute: u32) -> serde_json::Value {
    json!({
        "event_type": event_type,
        "session_id": session_id,
        "product_id": product_id,
        "occurred_at": format!("2026-01-15T09:{minute:02}:00Z"),
    })
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_ingested_events_reach_funnel_after_aggregation(pool: PgPool) {
    // Ingest one shopper who converts and one who only browses.
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::post_json(
        app,
        "/api/v1/events/batch",
        &json!({
            "events": [
                visit("PRODUCT_VIEW", "s-1", 5, 1),
                visit("ADD_TO_CART", "s-1", 5, 2),
                visit("START_CHECKOUT", "s-1", 5, 3),
                visit("PURCHASE", "s-1", 5, 4),
                visit("VIEW", "s-2", 5, 5),
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["accepted"], 5);

    // Nothing is visible before a run publishes buckets.
    let app = common::build_test_app(pool.clone());
    let (_, json) = common::get_json(app, "/api/v1/analytics/funnel").await;
    assert_eq!(json["steps"][0]["count"], 0);

    let app = common::build_test_app(pool.clone());
    let (status, json) = common::post_empty(app, "/api/v1/admin/aggregation/run").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["events"], 5);

    let app = common::build_test_app(pool.clone());
    let (status, json) = common::get_json(app, "/api/v1/analytics/funnel").await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<i64> = json["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["count"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, vec![2, 1, 1, 1]);
    assert!(
        (json["overall_conversion"].as_f64().unwrap() - 0.5).abs() < f64::EPSILON
    );

    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/api/v1/analytics/top-products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["product_id"], 5);
    assert_eq!(json[0]["views"], 2);
    assert_eq!(json[0]["purchases"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_rerunning_aggregation_does_not_double_count(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::post_json(app, "/api/v1/events", &visit("PRODUCT_VIEW", "s-1", 9, 30)).await;

    for _ in 0..2 {
        let app = common::build_test_app(pool.clone());
        let (status, _) = common::post_empty(app, "/api/v1/admin/aggregation/run").await;
        assert_eq!(status, StatusCode::OK);
    }

    let app = common::build_test_app(pool);
    let (_, json) = common::get_json(app, "/api/v1/analytics/funnel").await;
    assert_eq!(json["steps"][0]["count"], 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_redelivered_event_is_stored_once(pool: PgPool) {
    let mut body = visit("SEARCH", "s-1", 1, 10);
    body["event_id"] = json!("0190b6a1-7c2e-7b3a-9d4f-2a1b3c4d5e6f");

    let app = common::build_test_app(pool.clone());
    let (_, first) = common::post_json(app, "/api/v1/events", &body).await;
    let app = common::build_test_app(pool.clone());
    let (status, second) = common::post_json(app, "/api/v1/events", &body).await;

    assert_eq!(first["accepted"], 1);
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(second["accepted"], 0);
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics_events_raw")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_malformed_metadata_is_rejected(pool: PgPool) {
    let mut body = visit("PRODUCT_VIEW", "s-1", 1, 10);
    body["metadata"] = json!(["not", "an", "object"]);

    let app = common::build_test_app(pool);
    let (status, json) = common::post_json(app, "/api/v1/events", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
