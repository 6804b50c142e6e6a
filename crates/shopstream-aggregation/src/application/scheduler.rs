//! Fixed-delay timer that drives aggregation runs.

use std::sync::Arc;

use shopstream_core::clock::Clock;
use shopstream_core::repository::AggregationStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::application::command_handlers::handle_run_aggregation;
use crate::domain::commands::{AggregationTrigger, RunAggregation};
use crate::domain::settings::AggregationSettings;

/// Spawns the aggregation timer.
///
/// Each tick runs one aggregation and then waits `settings.fixed_delay`
/// before the next, so runs from one scheduler never overlap. Failures are
/// logged and retried on the next tick. The task exits once `shutdown`
/// changes or its sender is dropped.
#[must_use]
pub fn spawn_aggregation_scheduler(
    settings: AggregationSettings,
    clock: Arc<dyn Clock>,
    store: Arc<dyn AggregationStore>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            fixed_delay_ms = u64::try_from(settings.fixed_delay.as_millis()).unwrap_or(u64::MAX),
            "aggregation scheduler started"
        );
        loop {
            if *shutdown.borrow() {
                break;
            }

            let command = RunAggregation::new(AggregationTrigger::Scheduled);
            if let Err(e) =
                handle_run_aggregation(&command, &settings, clock.as_ref(), store.as_ref()).await
            {
                error!(error = %e, "scheduled aggregation failed");
            }

            tokio::select! {
                () = tokio::time::sleep(settings.fixed_delay) => {}
                _ = shutdown.changed() => break,
            }
        }
        info!("aggregation scheduler stopped");
    })
}
