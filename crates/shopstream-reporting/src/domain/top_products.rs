//! Top-product ranking over hourly rollups.

use std::collections::BTreeMap;

use serde::Serialize;
use shopstream_core::event::EventType;
use shopstream_core::metrics::{AggregatedBucket, NO_PRODUCT};

use super::ratio;

/// Per-product commerce counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMetrics {
    /// The product.
    pub product_id: i32,
    /// `PRODUCT_VIEW` events.
    pub views: i64,
    /// `ADD_TO_CART` events.
    pub add_to_cart: i64,
    /// `PURCHASE` events.
    pub purchases: i64,
    /// `add_to_cart / views`, zero without views.
    pub view_to_cart_conversion: f64,
    /// `purchases / add_to_cart`, zero without cart adds.
    pub cart_to_purchase_conversion: f64,
}

/// Ranks products by purchases, then cart adds, then views (all
/// descending), then product id ascending, and keeps the first `limit`.
///
/// Buckets without a product are ignored.
#[must_use]
pub fn rank_products(buckets: &[AggregatedBucket], limit: usize) -> Vec<ProductMetrics> {
    let mut counts: BTreeMap<i32, (i64, i64, i64)> = BTreeMap::new();
    for bucket in buckets.iter().filter(|b| b.product_key > NO_PRODUCT) {
        let entry = counts.entry(bucket.product_key).or_default();
        match bucket.event_type {
            EventType::ProductView => entry.0 += bucket.total_events,
            EventType::AddToCart => entry.1 += bucket.total_events,
            EventType::Purchase => entry.2 += bucket.total_events,
            _ => {}
        }
    }

    let mut ranked: Vec<ProductMetrics> = counts
        .into_iter()
        .map(|(product_id, (views, add_to_cart, purchases))| ProductMetrics {
            product_id,
            views,
            add_to_cart,
            purchases,
            view_to_cart_conversion: ratio(add_to_cart, views).unwrap_or(0.0),
            cart_to_purchase_conversion: ratio(purchases, add_to_cart).unwrap_or(0.0),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.purchases
            .cmp(&a.purchases)
            .then(b.add_to_cart.cmp(&a.add_to_cart))
            .then(b.views.cmp(&a.views))
            .then(a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}
