//! Operator routes.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use shopstream_aggregation::application::command_handlers::{self, AggregationOutcome};
use shopstream_aggregation::domain::commands::{AggregationTrigger, RunAggregation};

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for POST /aggregation/run.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AggregationRunResponse {
    /// Nothing to cover; no writes.
    Skipped {
        /// Watermark observed by the run.
        last_processed_at: DateTime<Utc>,
    },
    /// Buckets were rewritten and the watermark advanced to `to`.
    Completed {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        buckets: usize,
        events: usize,
    },
}

impl From<AggregationOutcome> for AggregationRunResponse {
    fn from(outcome: AggregationOutcome) -> Self {
        match outcome {
            AggregationOutcome::Skipped { last_processed_at } => {
                Self::Skipped { last_processed_at }
            }
            AggregationOutcome::Completed(report) => Self::Completed {
                from: report.from,
                to: report.to,
                buckets: report.buckets,
                events: report.events,
            },
        }
    }
}

/// POST /aggregation/run
#[instrument(skip(state))]
async fn run_aggregation(
    State(state): State<AppState>,
) -> Result<Json<AggregationRunResponse>, ApiError> {
    let command = RunAggregation::new(AggregationTrigger::Manual);

    info!(correlation_id = %command.correlation_id, "handling run_aggregation command");

    let outcome = command_handlers::handle_run_aggregation(
        &command,
        &state.aggregation,
        state.clock.as_ref(),
        &*state.aggregation_store,
    )
    .await?;

    Ok(Json(outcome.into()))
}

/// Returns the router for operator actions.
pub fn router() -> Router<AppState> {
    Router::new().route("/aggregation/run", post(run_aggregation))
}
