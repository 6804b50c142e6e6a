//! Application layer for the Recommendation context.

pub mod query_handlers;
