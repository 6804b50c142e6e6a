//! Shopstream — Ingestion bounded context.
//!
//! Normalizes inbound behavior events and appends them to the event store.
//! Redelivered events are absorbed by the store's insert-if-absent contract.

pub mod application;
pub mod domain;
