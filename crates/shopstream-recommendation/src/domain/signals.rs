//! Signal computation over raw events and rollups.

use std::collections::HashMap;

use shopstream_core::catalog::Product;
use shopstream_core::event::ScoringEvent;
use shopstream_core::metrics::{AggregatedBucket, NO_PRODUCT};

use super::weights::{affinity_weight, direct_weight, global_weight};

/// Maps events to brands through the catalog.
#[derive(Debug, Default)]
pub struct BrandResolver {
    product_brands: HashMap<i32, Option<i32>>,
}

impl BrandResolver {
    /// Indexes every catalog product, listed or not.
    #[must_use]
    pub fn new(products: &[Product]) -> Self {
        Self {
            product_brands: products.iter().map(|p| (p.id, p.brand_id)).collect(),
        }
    }

    /// The brand of the event's product if the catalog knows one, else the
    /// event's `brandId` hint.
    #[must_use]
    pub fn resolve(&self, event: &ScoringEvent) -> Option<i32> {
        event
            .product_id
            .and_then(|id| self.product_brands.get(&id).copied().flatten())
            .or(event.brand_hint)
    }
}

/// The three per-viewer inputs to the blend.
#[derive(Debug, Default)]
pub struct Signals {
    /// Direct interest per product id.
    pub direct: HashMap<i32, f64>,
    /// Affinity per brand id.
    pub affinity: HashMap<i32, f64>,
    /// Global trend per product id.
    pub global: HashMap<i32, f64>,
}

/// Sums direct weights of the viewer's events per product.
#[must_use]
pub fn direct_signal(events: &[ScoringEvent]) -> HashMap<i32, f64> {
    let mut scores = HashMap::new();
    for event in events {
        if let Some(product_id) = event.product_id {
            *scores.entry(product_id).or_insert(0.0) += direct_weight(event.event_type);
        }
    }
    scores
}

/// Sums affinity weights of the viewer's events per resolved brand.
#[must_use]
pub fn affinity_signal(events: &[ScoringEvent], resolver: &BrandResolver) -> HashMap<i32, f64> {
    let mut scores = HashMap::new();
    for event in events {
        if let Some(brand_id) = resolver.resolve(event) {
            *scores.entry(brand_id).or_insert(0.0) += affinity_weight(event.event_type);
        }
    }
    scores
}

/// Sums global weights times event counts per product.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn global_signal(buckets: &[AggregatedBucket]) -> HashMap<i32, f64> {
    let mut scores = HashMap::new();
    for bucket in buckets.iter().filter(|b| b.product_key > NO_PRODUCT) {
        *scores.entry(bucket.product_key).or_insert(0.0) +=
            bucket.total_events as f64 * global_weight(bucket.event_type);
    }
    scores
}
