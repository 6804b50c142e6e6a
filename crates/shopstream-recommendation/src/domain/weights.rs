//! Fixed per-event-type weights.

use shopstream_core::event::EventType;

/// Multiplier of the direct signal in the blend.
pub const DIRECT_BLEND: f64 = 2.4;
/// Multiplier of the affinity signal in the blend.
pub const AFFINITY_BLEND: f64 = 1.1;
/// Multiplier of the global-trend signal in the blend.
pub const GLOBAL_BLEND: f64 = 0.06;

/// Weight of a viewer's event towards the product it touched.
#[must_use]
pub fn direct_weight(event_type: EventType) -> f64 {
    match event_type {
        EventType::Purchase => 16.0,
        EventType::AddToCart => 7.0,
        EventType::FavoriteAdd => 6.0,
        EventType::ProductView => 2.0,
        EventType::Search => 0.8,
        EventType::RemoveFromCart | EventType::StartCheckout | EventType::BrandClick => 0.0,
    }
}

/// Weight of a viewer's event towards the brand it resolves to.
#[must_use]
pub fn affinity_weight(event_type: EventType) -> f64 {
    match event_type {
        EventType::Purchase => 10.0,
        EventType::AddToCart => 6.0,
        EventType::FavoriteAdd => 5.0,
        EventType::BrandClick => 4.0,
        EventType::ProductView => 2.5,
        EventType::Search => 1.0,
        EventType::RemoveFromCart | EventType::StartCheckout => 0.0,
    }
}

/// Weight of one rolled-up event towards a product's global trend.
#[must_use]
pub fn global_weight(event_type: EventType) -> f64 {
    match event_type {
        EventType::Purchase => 4.0,
        EventType::AddToCart => 2.0,
        EventType::ProductView => 0.4,
        _ => 0.0,
    }
}

/// Weight of one event in brand rankings.
#[must_use]
pub fn brand_rank_weight(event_type: EventType) -> f64 {
    match event_type {
        EventType::Purchase => 4.0,
        EventType::AddToCart => 2.0,
        EventType::BrandClick => 1.5,
        EventType::ProductView => 0.5,
        _ => 0.0,
    }
}
