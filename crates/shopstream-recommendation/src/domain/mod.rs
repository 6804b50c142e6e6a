//! Domain layer for the Recommendation context.

pub mod brands;
pub mod jitter;
pub mod ranking;
pub mod signals;
pub mod weights;
