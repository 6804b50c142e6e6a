//! Shopstream Core — shared domain abstractions.
//!
//! This crate defines the event model, the hourly bucket model and the store
//! traits that every bounded context depends on. It contains no
//! infrastructure code.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod event;
pub mod metrics;
pub mod query;
pub mod repository;
pub mod time;
