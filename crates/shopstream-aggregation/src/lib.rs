//! Shopstream — Aggregation bounded context.
//!
//! Rolls raw behavior events up into hourly buckets. Every run re-scans a
//! trailing lookback window so late events are folded into buckets that were
//! already published, and replaces the affected buckets wholesale inside one
//! exclusive unit of work.

pub mod application;
pub mod domain;
