//! Shopstream — Recommendation bounded context.
//!
//! Ranks catalog products for a viewer from three signals: the viewer's own
//! product interactions, the viewer's brand affinity and the global trend in
//! the hourly rollups. The blend is a fixed linear combination, so every
//! score can be explained from its parts.

pub mod application;
pub mod domain;
