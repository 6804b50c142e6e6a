//! Shared test doubles and utilities for the Shopstream analytics service.

mod catalog;
mod clock;
mod fixtures;
mod store;

pub use catalog::StaticCatalog;
pub use clock::FixedClock;
pub use fixtures::{at, event};
pub use store::{FailingStore, InMemoryAnalyticsStore};
