//! Domain layer for the Aggregation context.

pub mod commands;
pub mod rollup;
pub mod settings;
pub mod window;
