//! Application layer for the Reporting context.

pub mod query_handlers;
