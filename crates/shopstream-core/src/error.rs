//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Duplicate event ids are not represented here: they are silently ignored
/// and only show up as a lower accepted count.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Rejected input (bad event type, malformed metadata, inverted window).
    #[error("validation error: {0}")]
    Validation(String),

    /// An aggregation unit of work failed and was rolled back.
    #[error("aggregation failed: {0}")]
    Aggregation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
