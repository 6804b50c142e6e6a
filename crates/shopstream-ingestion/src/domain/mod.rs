//! Domain layer for the Ingestion context.

pub mod commands;
pub mod normalize;
