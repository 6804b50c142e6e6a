//! Command handlers for the Aggregation context.
//!
//! `handle_run_aggregation` is the single entry point for both the timer and
//! the admin trigger, so every run goes through the same lease.

use chrono::{DateTime, Utc};
use shopstream_core::clock::Clock;
use shopstream_core::error::DomainError;
use shopstream_core::repository::{AggregationStore, AggregationUnit};
use tracing::{debug, info, instrument, warn};

use crate::domain::commands::RunAggregation;
use crate::domain::rollup::rollup;
use crate::domain::settings::AggregationSettings;
use crate::domain::window::AggregationWindow;

/// Summary of a committed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationReport {
    /// Inclusive, hour-aligned start of the re-aggregated range.
    pub from: DateTime<Utc>,
    /// Exclusive end of the range; the new watermark.
    pub to: DateTime<Utc>,
    /// Buckets written.
    pub buckets: usize,
    /// Raw events folded into those buckets.
    pub events: usize,
}

/// Result of one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationOutcome {
    /// Nothing to cover; the lease was released without writes.
    Skipped {
        /// Watermark observed under the lease.
        last_processed_at: DateTime<Utc>,
    },
    /// Buckets were replaced and the watermark advanced.
    Completed(AggregationReport),
}

async fn aggregate(
    unit: &mut dyn AggregationUnit,
    window: AggregationWindow,
    now: DateTime<Utc>,
) -> Result<AggregationReport, DomainError> {
    let facts = unit.load_facts(window.from, window.upper_bound).await?;
    let buckets = rollup(&facts, now);

    unit.replace_buckets(window.first_hour(), window.last_hour(), &buckets)
        .await?;
    let watermark = unit.last_processed_at().max(window.upper_bound);
    unit.set_last_processed_at(watermark).await?;

    Ok(AggregationReport {
        from: window.from,
        to: window.upper_bound,
        buckets: buckets.len(),
        events: facts.len(),
    })
}

/// Handles the `RunAggregation` command: takes the aggregation lease,
/// re-aggregates the planned window and publishes the result atomically.
///
/// The watermark never moves backwards, even if the clock does.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the lease cannot be acquired and
/// `DomainError::Aggregation` if the unit of work failed and was rolled back.
#[instrument(
    skip_all,
    fields(correlation_id = %command.correlation_id, trigger = %command.trigger)
)]
pub async fn handle_run_aggregation(
    command: &RunAggregation,
    settings: &AggregationSettings,
    clock: &dyn Clock,
    store: &dyn AggregationStore,
) -> Result<AggregationOutcome, DomainError> {
    let now = clock.now();
    let upper_bound = AggregationWindow::upper_bound(now, settings.lag);

    let mut unit = store.begin().await?;
    let last_processed_at = unit.last_processed_at();

    let Some(window) = AggregationWindow::plan(upper_bound, last_processed_at, settings.lookback)
    else {
        unit.rollback().await?;
        debug!(%last_processed_at, %upper_bound, "aggregation skipped: nothing to cover");
        return Ok(AggregationOutcome::Skipped { last_processed_at });
    };

    let report = match aggregate(unit.as_mut(), window, now).await {
        Ok(report) => report,
        Err(e) => {
            if let Err(rollback_error) = unit.rollback().await {
                warn!(error = %rollback_error, "aggregation rollback failed");
            }
            return Err(DomainError::Aggregation(e.to_string()));
        }
    };
    unit.commit()
        .await
        .map_err(|e| DomainError::Aggregation(e.to_string()))?;

    info!(
        from = %report.from,
        to = %report.to,
        buckets = report.buckets,
        events = report.events,
        "aggregation completed"
    );
    Ok(AggregationOutcome::Completed(report))
}
