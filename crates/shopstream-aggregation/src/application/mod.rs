//! Application layer for the Aggregation context.

pub mod command_handlers;
pub mod scheduler;
