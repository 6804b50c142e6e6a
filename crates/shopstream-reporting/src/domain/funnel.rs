//! Purchase funnel over hourly rollups.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopstream_core::event::EventType;
use shopstream_core::metrics::AggregatedBucket;
use shopstream_core::query::ReportWindow;

use super::ratio;

/// Funnel steps, in order.
pub const FUNNEL_STEPS: [EventType; 4] = [
    EventType::ProductView,
    EventType::AddToCart,
    EventType::StartCheckout,
    EventType::Purchase,
];

/// One funnel step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStep {
    /// The step's event type.
    pub event_type: EventType,
    /// Events of that type in the window.
    pub count: i64,
    /// `count / previous step count`; absent for the first step or when the
    /// previous step is zero.
    pub conversion: Option<f64>,
}

/// The funnel report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelReport {
    /// Inclusive window start.
    pub from: DateTime<Utc>,
    /// Inclusive window end.
    pub to: DateTime<Utc>,
    /// `purchases / views`, zero without views.
    pub overall_conversion: f64,
    /// The steps of [`FUNNEL_STEPS`] in order.
    pub steps: Vec<FunnelStep>,
}

/// Builds the funnel from the buckets inside `window`.
#[must_use]
pub fn build_funnel(window: ReportWindow, buckets: &[AggregatedBucket]) -> FunnelReport {
    let total = |event_type: EventType| -> i64 {
        buckets
            .iter()
            .filter(|b| b.event_type == event_type)
            .map(|b| b.total_events)
            .sum()
    };

    let mut previous = 0;
    let steps = FUNNEL_STEPS
        .into_iter()
        .map(|event_type| {
            let count = total(event_type);
            let step = FunnelStep {
                event_type,
                count,
                conversion: ratio(count, previous),
            };
            previous = count;
            step
        })
        .collect();

    FunnelReport {
        from: window.from,
        to: window.to,
        overall_conversion: ratio(total(EventType::Purchase), total(EventType::ProductView))
            .unwrap_or(0.0),
        steps,
    }
}
