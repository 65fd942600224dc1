//! Gap percentage of a price against a reference price.

/// Percentage change from `reference` to `price`.
///
/// Returns 0.0 when the reference is not a positive finite number, so a
/// missing prior close never turns into an infinite gap.
pub fn gap_pct(reference: f64, price: f64) -> f64 {
    if !reference.is_finite() || reference <= 0.0 {
        return 0.0;
    }
    (price - reference) / reference * 100.0
}
