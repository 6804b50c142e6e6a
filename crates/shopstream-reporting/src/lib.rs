//! Shopstream — Reporting bounded context.
//!
//! Stateless reports over the hourly rollups. Reports only see data the
//! aggregation has already published, never raw events.

pub mod application;
pub mod domain;
