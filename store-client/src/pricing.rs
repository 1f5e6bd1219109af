//! Promotional pricing transform
//!
//! Display-only fabrication of an "original" price and discount badge for
//! the product card. Pure and deterministic: the same (product id, price)
//! pair always yields the same output. It neither reads nor writes any
//! stored discount state.

/// Fabricated display pricing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromoPricing {
    pub original_price: f64,
    /// Integer percentage in [10, 30]
    pub discount_percent: u32,
}

/// Round up to a friendly step: 10 for low values, 20 for mid, 50 for higher.
/// The step is chosen from the actual price, not the unrounded target.
fn friendly_step(actual_price: f64) -> f64 {
    if actual_price < 200.0 {
        10.0
    } else if actual_price < 500.0 {
        20.0
    } else {
        50.0
    }
}

/// Deterministic pseudo-random discount between 10% and 30% based on the
/// product id, re-anchored to a rounded-up "original" price.
pub fn promo_pricing(product_id: &str, actual_price: f64) -> PromoPricing {
    // char-code sum of the id drives the target discount
    let hash: u64 = product_id.chars().map(|c| c as u64).sum();
    let target_discount_percent = 10 + (hash % 21); // 10..=30
    let multiplier = 1.0 - target_discount_percent as f64 / 100.0;

    // Compute target original, then round it up to a friendlier price point
    let target_original = actual_price / multiplier;
    let step = friendly_step(actual_price);
    let original_price = (target_original / step).ceil() * step;

    // Recompute the displayed discount from the rounded original, clamped
    // back into 10..=30
    let computed = ((1.0 - actual_price / original_price) * 100.0).round() as i64;
    let discount_percent = computed.clamp(10, 30) as u32;

    PromoPricing {
        original_price,
        discount_percent,
    }
}
