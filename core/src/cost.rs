//! Exponential cost curve.

/// Growth multiplier used by the default catalog.
pub const DEFAULT_GROWTH: f64 = 1.15;

/// Price of the next purchase of an upgrade currently at `level`:
/// `floor(base_cost × growth^level)`.
pub fn cost(base_cost: f64, growth: f64, level: u32) -> f64 {
    let exp = i32::try_from(level).unwrap_or(i32::MAX);
    (base_cost * growth.powi(exp)).floor()
}

/// Total price of buying `count` levels in a row starting at `level`.
pub fn cost_of_many(base_cost: f64, growth: f64, level: u32, count: u32) -> f64 {
    (0..count)
        .map(|i| cost(base_cost, growth, level.saturating_add(i)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_base_cost() {
        assert_eq!(cost(15.0, DEFAULT_GROWTH, 0), 15.0);
    }

    #[test]
    fn floors_fractional_prices() {
        // 15 × 1.15 = 17.25
        assert_eq!(cost(15.0, DEFAULT_GROWTH, 1), 17.0);
        // 50 × 1.15² = 66.125
        assert_eq!(cost(50.0, DEFAULT_GROWTH, 2), 66.0);
    }

    #[test]
    fn many_sums_consecutive_levels() {
        let expected = cost(10.0, 2.0, 3) + cost(10.0, 2.0, 4);
        assert_eq!(cost_of_many(10.0, 2.0, 3, 2), expected);
        assert_eq!(cost_of_many(10.0, 2.0, 3, 0), 0.0);
    }
}
