//! Shopstream analytics API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use shopstream_aggregation::application::scheduler::spawn_aggregation_scheduler;
use shopstream_api::config::AppConfig;
use shopstream_api::error::AppError;
use shopstream_api::routes;
use shopstream_api::state::AppState;
use shopstream_api::telemetry;
use shopstream_core::clock::{Clock, SystemClock};
use shopstream_event_store::schema::MIGRATOR;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    let tracer_provider = telemetry::init_tracing()?;

    tracing::info!("Starting Shopstream analytics API server");

    let pool = PgPoolOptions::new()
        .max_connections(config.pool_max)
        .connect(&config.database_url)
        .await
        .map_err(AppError::from)?;
    MIGRATOR.run(&pool).await.map_err(AppError::from)?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let app_state = AppState::postgres(pool, Arc::clone(&clock), config.aggregation);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = if config.aggregation_enabled {
        Some(spawn_aggregation_scheduler(
            config.aggregation,
            clock,
            Arc::clone(&app_state.aggregation_store),
            shutdown_rx,
        ))
    } else {
        tracing::info!("aggregation timer disabled; manual trigger only");
        None
    };

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::from)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(AppError::from)?;

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.await {
            tracing::warn!(error = %e, "aggregation scheduler ended abnormally");
        }
    }
    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "failed to flush spans");
        }
    }

    Ok(())
}
