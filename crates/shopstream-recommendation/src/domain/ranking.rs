//! Candidate eligibility, blending and ordering.

use std::fmt;

use serde::Serialize;
use shopstream_core::catalog::Product;

use super::jitter::jitter;
use super::signals::Signals;
use super::weights::{AFFINITY_BLEND, DIRECT_BLEND, GLOBAL_BLEND};

/// Why a product was recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The viewer touched the product and likes its brand.
    DirectAndBrandInterest,
    /// The viewer touched the product.
    DirectInterest,
    /// The viewer likes the product's brand.
    BrandAffinity,
    /// Neither; the product ranks on global trend alone.
    GlobalTrending,
}

impl Reason {
    fn from_scores(direct: f64, affinity: f64) -> Self {
        match (direct > 0.0, affinity > 0.0) {
            (true, true) => Self::DirectAndBrandInterest,
            (true, false) => Self::DirectInterest,
            (false, true) => Self::BrandAffinity,
            (false, false) => Self::GlobalTrending,
        }
    }

    /// Wire name of the reason.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectAndBrandInterest => "direct_and_brand_interest",
            Self::DirectInterest => "direct_interest",
            Self::BrandAffinity => "brand_affinity",
            Self::GlobalTrending => "global_trending",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked product with its score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    /// The product.
    pub product_id: i32,
    /// Blended total including jitter.
    pub score: f64,
    /// Unweighted direct signal.
    pub direct_score: f64,
    /// Unweighted affinity signal of the product's brand.
    pub affinity_score: f64,
    /// Unweighted global-trend signal.
    pub global_score: f64,
    /// Explanation derived from the personal signals.
    pub reason: Reason,
}

/// Which products may be recommended.
#[derive(Debug, Clone, Default)]
pub struct Eligibility<'a> {
    /// Only products in this category, when set.
    pub category_id: Option<i32>,
    /// Products never to return.
    pub excluded: &'a [i32],
}

impl Eligibility<'_> {
    fn admits(&self, product: &Product) -> bool {
        let category = product.category_id;
        product.is_listed()
            && self.category_id.is_none_or(|c| category == Some(c))
            && !self.excluded.contains(&product.id)
    }
}

/// Scores every eligible product, drops non-positive totals, orders by
/// total descending then product id ascending and keeps `limit`.
#[must_use]
pub fn rank_candidates(
    products: &[Product],
    signals: &Signals,
    eligibility: &Eligibility<'_>,
    seed: &str,
    limit: usize,
) -> Vec<ScoredProduct> {
    let mut ranked: Vec<ScoredProduct> = products
        .iter()
        .filter(|p| eligibility.admits(p))
        .map(|p| {
            let direct_score = signals.direct.get(&p.id).copied().unwrap_or(0.0);
            let affinity_score = p
                .brand_id
                .and_then(|b| signals.affinity.get(&b).copied())
                .unwrap_or(0.0);
            let global_score = signals.global.get(&p.id).copied().unwrap_or(0.0);
            let score = direct_score * DIRECT_BLEND
                + affinity_score * AFFINITY_BLEND
                + global_score * GLOBAL_BLEND
                + jitter(p.id, seed);
            ScoredProduct {
                product_id: p.id,
                score,
                direct_score,
                affinity_score,
                global_score,
                reason: Reason::from_scores(direct_score, affinity_score),
            }
        })
        .filter(|s| s.score > 0.0)
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}
