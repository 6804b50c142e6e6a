//! Commands for the Aggregation context.

use std::fmt;

use uuid::Uuid;

/// What asked for an aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationTrigger {
    /// The fixed-delay timer.
    Scheduled,
    /// An operator through the admin endpoint.
    Manual,
}

impl fmt::Display for AggregationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => f.write_str("scheduled"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Command to run one aggregation pass.
#[derive(Debug, Clone)]
pub struct RunAggregation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Who asked for the run.
    pub trigger: AggregationTrigger,
}

impl RunAggregation {
    /// Creates a command with a fresh correlation ID.
    #[must_use]
    pub fn new(trigger: AggregationTrigger) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            trigger,
        }
    }
}
