//! Query parameter resolution shared by report and recommendation handlers.
//!
//! Limits and windows are clamped rather than rejected; the only hard
//! rejection is a window whose end does not come after its start.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::DomainError;
use crate::time::floor_to_second;

/// Limit applied when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 20;

/// Upper bound for any caller-supplied limit.
pub const MAX_LIMIT: i64 = 100;

/// Clamps a requested limit into `[1, MAX_LIMIT]`, defaulting to
/// [`DEFAULT_LIMIT`].
#[must_use]
pub fn clamp_limit(requested: Option<i64>) -> usize {
    let clamped = requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    usize::try_from(clamped).unwrap_or(1)
}

/// A resolved, second-aligned reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    /// Inclusive start.
    pub from: DateTime<Utc>,
    /// Inclusive end.
    pub to: DateTime<Utc>,
}

impl ReportWindow {
    /// Resolves optional bounds: `to` defaults to `now`, `from` defaults to
    /// `to - default_span`, clamped to the earliest representable instant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `to` is not after `from`.
    pub fn resolve(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        default_span: TimeDelta,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let to = to.unwrap_or(now);
        let from = from.unwrap_or_else(|| {
            to.checked_sub_signed(default_span)
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        });
        if to <= from {
            return Err(DomainError::Validation(
                "to must be greater than from".to_owned(),
            ));
        }
        Ok(Self {
            from: floor_to_second(from),
            to: floor_to_second(to),
        })
    }
}

/// Parses a comma-separated id list. Blank, unparsable, non-positive and
/// repeated entries are dropped; first-seen order is kept.
#[must_use]
pub fn parse_id_list(raw: Option<&str>) -> Vec<i32> {
    let mut ids: Vec<i32> = Vec::new();
    for id in raw
        .unwrap_or_default()
        .split(',')
        .filter_map(|part| part.trim().parse::<i32>().ok())
        .filter(|id| *id > 0)
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
