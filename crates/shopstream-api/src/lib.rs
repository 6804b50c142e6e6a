//! Shopstream — HTTP API library.
//!
//! Exposes configuration, error mapping, shared state and the route tree so
//! the binary and the integration tests assemble the same application.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
