//! Brand rankings, personal and global.

use std::collections::HashMap;

use serde::Serialize;
use shopstream_core::catalog::Brand;
use shopstream_core::event::{EventType, ScoringEvent};

use super::signals::BrandResolver;
use super::weights::brand_rank_weight;

/// Engagement counts for one brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandMetrics {
    /// The brand.
    pub brand_id: i32,
    /// The brand's display name.
    pub brand_name: String,
    /// `PRODUCT_VIEW` events.
    pub views: i64,
    /// `ADD_TO_CART` events.
    pub add_to_cart: i64,
    /// `PURCHASE` events.
    pub purchases: i64,
    /// `BRAND_CLICK` events.
    pub brand_clicks: i64,
    /// Counts blended with the brand ranking weights.
    pub weighted_score: f64,
}

#[derive(Default)]
struct BrandCounts {
    views: i64,
    add_to_cart: i64,
    purchases: i64,
    brand_clicks: i64,
}

impl BrandCounts {
    fn record(&mut self, event_type: EventType) {
        match event_type {
            EventType::ProductView => self.views += 1,
            EventType::AddToCart => self.add_to_cart += 1,
            EventType::Purchase => self.purchases += 1,
            EventType::BrandClick => self.brand_clicks += 1,
            _ => {}
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn weighted_score(&self) -> f64 {
        self.purchases as f64 * brand_rank_weight(EventType::Purchase)
            + self.add_to_cart as f64 * brand_rank_weight(EventType::AddToCart)
            + self.brand_clicks as f64 * brand_rank_weight(EventType::BrandClick)
            + self.views as f64 * brand_rank_weight(EventType::ProductView)
    }
}

/// Ranks the brands `events` resolve to.
///
/// Brands missing from `brands` are dropped. Order is weighted score, then
/// purchases, cart adds and views (all descending), then brand id ascending.
#[must_use]
pub fn rank_brands(
    events: &[ScoringEvent],
    resolver: &BrandResolver,
    brands: &[Brand],
    limit: usize,
) -> Vec<BrandMetrics> {
    let names: HashMap<i32, &str> = brands.iter().map(|b| (b.id, b.name.as_str())).collect();

    let mut counts: HashMap<i32, BrandCounts> = HashMap::new();
    for event in events {
        if let Some(brand_id) = resolver.resolve(event).filter(|id| names.contains_key(id)) {
            counts.entry(brand_id).or_default().record(event.event_type);
        }
    }

    let mut ranked: Vec<BrandMetrics> = counts
        .into_iter()
        .map(|(brand_id, c)| BrandMetrics {
            brand_id,
            brand_name: names.get(&brand_id).copied().unwrap_or_default().to_owned(),
            weighted_score: c.weighted_score(),
            views: c.views,
            add_to_cart: c.add_to_cart,
            purchases: c.purchases,
            brand_clicks: c.brand_clicks,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.weighted_score
            .total_cmp(&a.weighted_score)
            .then(b.purchases.cmp(&a.purchases))
            .then(b.add_to_cart.cmp(&a.add_to_cart))
            .then(b.views.cmp(&a.views))
            .then(a.brand_id.cmp(&b.brand_id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopstream_core::catalog::Product;

    fn scoring(
        event_type: EventType,
        product_id: Option<i32>,
        brand_hint: Option<i32>,
    ) -> ScoringEvent {
        ScoringEvent {
            event_type,
            product_id,
            brand_hint,
        }
    }

    fn brands() -> Vec<Brand> {
        [(1, "Acme"), (2, "Globex"), (3, "Initech")]
            .into_iter()
            .map(|(id, name)| Brand {
                id,
                name: name.to_owned(),
            })
            .collect()
    }

    fn resolver() -> BrandResolver {
        BrandResolver::new(&[Product {
            id: 100,
            brand_id: Some(1),
            category_id: None,
            available: true,
            deleted: true,
        }])
    }

    #[test]
    fn test_counts_and_weighted_score() {
        // Arrange
        let events = vec![
            scoring(EventType::Purchase, Some(100), None),
            scoring(EventType::ProductView, Some(100), None),
            scoring(EventType::BrandClick, None, Some(1)),
            scoring(EventType::Search, Some(100), None),
        ];

        // Act
        let ranked = rank_brands(&events, &resolver(), &brands(), 8);

        // Assert
        assert_eq!(ranked.len(), 1);
        let acme = &ranked[0];
        assert_eq!(acme.brand_name, "Acme");
        assert_eq!(
            (acme.views, acme.add_to_cart, acme.purchases, acme.brand_clicks),
            (1, 0, 1, 1)
        );
        assert!((acme.weighted_score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_brands_are_dropped() {
        let events = vec![scoring(EventType::Purchase, None, Some(42))];

        assert!(rank_brands(&events, &resolver(), &brands(), 8).is_empty());
    }

    #[test]
    fn test_tie_breaks_follow_purchases_then_cart_then_views_then_id() {
        // Brand 2: 1 purchase = 4.0. Brand 3: 2 cart adds = 4.0.
        // Brand 1: 8 views = 4.0. All tie on weighted score.
        let mut events = vec![scoring(EventType::Purchase, None, Some(2))];
        events.extend([scoring(EventType::AddToCart, None, Some(3)); 2]);
        events.extend([scoring(EventType::ProductView, None, Some(1)); 8]);

        let ranked = rank_brands(&events, &BrandResolver::default(), &brands(), 8);

        let ids: Vec<i32> = ranked.iter().map(|b| b.brand_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_exact_ties_fall_back_to_brand_id() {
        let events = vec![
            scoring(EventType::BrandClick, None, Some(3)),
            scoring(EventType::BrandClick, None, Some(2)),
        ];

        let ranked = rank_brands(&events, &BrandResolver::default(), &brands(), 1);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].brand_id, 2);
    }
}
