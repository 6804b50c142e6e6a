//! Domain layer for the Reporting context.

pub mod funnel;
pub mod top_products;

/// `numerator / denominator`, or `None` when the denominator is not positive.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(numerator: i64, denominator: i64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}
