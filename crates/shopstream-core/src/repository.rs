//! Store abstractions.
//!
//! The algorithmic core only sees these traits. Implementations own the
//! concurrency guarantees the core relies on: idempotent insert-by-id for the
//! event store and an exclusive, blocking lease for aggregation units.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::catalog::{Brand, Product};
use crate::error::DomainError;
use crate::event::{EventFact, RawEvent, ScoringEvent, ViewerIdentity};
use crate::metrics::AggregatedBucket;

/// Append-only store of raw behavior events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts each event unless one with the same id already exists.
    ///
    /// Returns how many events were newly stored. A duplicate id is never an
    /// error; implementations must provide insert-if-absent semantics even
    /// under concurrent writers.
    async fn insert_events(&self, events: &[RawEvent]) -> Result<u64, DomainError>;

    /// Loads the viewer's events with `occurred_at >= since`.
    async fn load_viewer_events(
        &self,
        viewer: &ViewerIdentity,
        since: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError>;

    /// Loads every event with `from <= occurred_at <= to`.
    async fn load_scoring_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError>;
}

/// Read access to hourly rollups.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Loads buckets with `from <= bucket_start <= to`.
    async fn load_buckets(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedBucket>, DomainError>;
}

/// Entry point to the aggregation critical section.
#[async_trait]
pub trait AggregationStore: Send + Sync {
    /// Acquires the aggregation lease, blocking until any other holder
    /// commits or rolls back, and returns the open unit of work.
    async fn begin(&self) -> Result<Box<dyn AggregationUnit>, DomainError>;
}

/// One exclusive aggregation unit of work.
///
/// Nothing written through a unit is visible until [`AggregationUnit::commit`]
/// succeeds. Dropping a unit without committing discards its writes and
/// releases the lease.
#[async_trait]
pub trait AggregationUnit: Send {
    /// Watermark read when the lease was acquired.
    fn last_processed_at(&self) -> DateTime<Utc>;

    /// Loads rollup inputs with `from <= occurred_at < to`.
    async fn load_facts(
        &mut self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventFact>, DomainError>;

    /// Deletes every bucket with `first_hour <= bucket_start <= last_hour`
    /// and inserts `buckets` in their place.
    async fn replace_buckets(
        &mut self,
        first_hour: DateTime<Utc>,
        last_hour: DateTime<Utc>,
        buckets: &[AggregatedBucket],
    ) -> Result<(), DomainError>;

    /// Stages the new watermark.
    async fn set_last_processed_at(&mut self, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Publishes all staged writes atomically and releases the lease.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    /// Discards all staged writes and releases the lease.
    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

/// Read-only view of the storefront catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Lists every product, including unavailable and soft-deleted ones.
    async fn list_products(&self) -> Result<Vec<Product>, DomainError>;

    /// Lists every brand.
    async fn list_brands(&self) -> Result<Vec<Brand>, DomainError>;
}
