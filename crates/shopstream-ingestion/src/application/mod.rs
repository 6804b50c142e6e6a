//! Application layer for the Ingestion context.

pub mod command_handlers;
