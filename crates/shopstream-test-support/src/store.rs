//! Test stores — in-memory implementations of every store trait.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopstream_core::catalog::{Brand, Product};
use shopstream_core::error::DomainError;
use shopstream_core::event::{EventFact, EventType, RawEvent, ScoringEvent, ViewerIdentity};
use shopstream_core::metrics::AggregatedBucket;
use shopstream_core::repository::{
    AggregationStore, AggregationUnit, EventStore, MetricsStore, ProductCatalog,
};
use tokio::sync::{Mutex as LeaseMutex, OwnedMutexGuard};

type BucketKey = (DateTime<Utc>, EventType, i32);

#[derive(Debug)]
struct Shared {
    events: Mutex<Vec<RawEvent>>,
    buckets: Mutex<BTreeMap<BucketKey, AggregatedBucket>>,
    watermark: Arc<LeaseMutex<DateTime<Utc>>>,
    fail_commits: AtomicBool,
    units_begun: AtomicUsize,
}

/// An event store, metrics store and aggregation store backed by process
/// memory.
///
/// The watermark sits behind a `tokio` mutex whose owned guard is the
/// aggregation lease, so concurrent units serialize exactly like they do
/// against the database row lock. Clones share state.
#[derive(Debug, Clone)]
pub struct InMemoryAnalyticsStore {
    shared: Arc<Shared>,
}

impl InMemoryAnalyticsStore {
    /// Creates an empty store whose watermark starts at `watermark`.
    #[must_use]
    pub fn new(watermark: DateTime<Utc>) -> Self {
        Self {
            shared: Arc::new(Shared {
                events: Mutex::new(Vec::new()),
                buckets: Mutex::new(BTreeMap::new()),
                watermark: Arc::new(LeaseMutex::new(watermark)),
                fail_commits: AtomicBool::new(false),
                units_begun: AtomicUsize::new(0),
            }),
        }
    }

    /// Makes every subsequent `commit` fail (and roll back) until reset.
    pub fn fail_commits(&self, fail: bool) {
        self.shared.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Stores buckets directly, bypassing aggregation.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed_buckets(&self, buckets: Vec<AggregatedBucket>) {
        let mut stored = self.shared.buckets.lock().unwrap();
        for bucket in buckets {
            stored.insert(bucket.key(), bucket);
        }
    }

    /// Returns a snapshot of all buckets ordered by key.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn buckets(&self) -> Vec<AggregatedBucket> {
        self.shared
            .buckets
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect()
    }

    /// Returns a snapshot of all stored events in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<RawEvent> {
        self.shared.events.lock().unwrap().clone()
    }

    /// Returns the committed watermark, waiting for any open unit.
    pub async fn last_processed_at(&self) -> DateTime<Utc> {
        *self.shared.watermark.lock().await
    }

    /// Number of aggregation units opened so far.
    pub fn units_begun(&self) -> usize {
        self.shared.units_begun.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventStore for InMemoryAnalyticsStore {
    async fn insert_events(&self, events: &[RawEvent]) -> Result<u64, DomainError> {
        let mut stored = self.shared.events.lock().unwrap();
        let mut accepted = 0;
        for event in events {
            if stored.iter().all(|existing| existing.id != event.id) {
                stored.push(event.clone());
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    async fn load_viewer_events(
        &self,
        viewer: &ViewerIdentity,
        since: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError> {
        Ok(self
            .shared
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.occurred_at >= since && viewer.owns(e))
            .map(ScoringEvent::from)
            .collect())
    }

    async fn load_scoring_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError> {
        Ok(self
            .shared
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.occurred_at >= from && e.occurred_at <= to)
            .map(ScoringEvent::from)
            .collect())
    }
}

#[async_trait]
impl MetricsStore for InMemoryAnalyticsStore {
    async fn load_buckets(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedBucket>, DomainError> {
        Ok(self
            .shared
            .buckets
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.bucket_start >= from && b.bucket_start <= to)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AggregationStore for InMemoryAnalyticsStore {
    async fn begin(&self) -> Result<Box<dyn AggregationUnit>, DomainError> {
        let lease = Arc::clone(&self.shared.watermark).lock_owned().await;
        self.shared.units_begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryUnit {
            shared: Arc::clone(&self.shared),
            lease,
            replacement: None,
            watermark: None,
        }))
    }
}

struct InMemoryUnit {
    shared: Arc<Shared>,
    lease: OwnedMutexGuard<DateTime<Utc>>,
    replacement: Option<(DateTime<Utc>, DateTime<Utc>, Vec<AggregatedBucket>)>,
    watermark: Option<DateTime<Utc>>,
}

#[async_trait]
impl AggregationUnit for InMemoryUnit {
    fn last_processed_at(&self) -> DateTime<Utc> {
        *self.lease
    }

    async fn load_facts(
        &mut self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventFact>, DomainError> {
        Ok(self
            .shared
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.occurred_at >= from && e.occurred_at < to)
            .map(EventFact::from)
            .collect())
    }

    async fn replace_buckets(
        &mut self,
        first_hour: DateTime<Utc>,
        last_hour: DateTime<Utc>,
        buckets: &[AggregatedBucket],
    ) -> Result<(), DomainError> {
        self.replacement = Some((first_hour, last_hour, buckets.to_vec()));
        Ok(())
    }

    async fn set_last_processed_at(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.watermark = Some(at);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let mut unit = *self;
        if unit.shared.fail_commits.load(Ordering::SeqCst) {
            return Err(DomainError::Infrastructure("commit failed".into()));
        }
        if let Some((first_hour, last_hour, buckets)) = unit.replacement.take() {
            let mut stored = unit.shared.buckets.lock().unwrap();
            stored.retain(|(start, _, _), _| *start < first_hour || *start > last_hour);
            for bucket in buckets {
                stored.insert(bucket.key(), bucket);
            }
        }
        if let Some(at) = unit.watermark {
            *unit.lease = at;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A store that fails every call with an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug, Clone, Copy)]
pub struct FailingStore;

fn unavailable() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

#[async_trait]
impl EventStore for FailingStore {
    async fn insert_events(&self, _events: &[RawEvent]) -> Result<u64, DomainError> {
        Err(unavailable())
    }

    async fn load_viewer_events(
        &self,
        _viewer: &ViewerIdentity,
        _since: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError> {
        Err(unavailable())
    }

    async fn load_scoring_events(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<ScoringEvent>, DomainError> {
        Err(unavailable())
    }
}

#[async_trait]
impl MetricsStore for FailingStore {
    async fn load_buckets(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<AggregatedBucket>, DomainError> {
        Err(unavailable())
    }
}

#[async_trait]
impl AggregationStore for FailingStore {
    async fn begin(&self) -> Result<Box<dyn AggregationUnit>, DomainError> {
        Err(unavailable())
    }
}

#[async_trait]
impl ProductCatalog for FailingStore {
    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        Err(unavailable())
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, DomainError> {
        Err(unavailable())
    }
}
