//! Monetary tolerances and rounding.
//!
//! Every comparison against zero in the engine goes through [`EPSILON`]:
//! differences at or below one cent are treated as noise left over from
//! splitting a total into shares (100.00 split three ways is
//! 33.33 + 33.33 + 33.34).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Tolerance below which a monetary difference counts as zero.
pub const EPSILON: Decimal = dec!(0.01);

/// Number of decimal places emitted in reports.
pub const DISPLAY_SCALE: u32 = 2;

/// Round an amount for output.
///
/// Uses round-half-away-from-zero, so `0.005` becomes `0.01` and
/// `-0.005` becomes `-0.01`. The result always carries exactly `scale`
/// decimal places (`30` becomes `30.00`) and zero is never signed.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::money::round_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_amount(dec!(33.335), 2), dec!(33.34));
/// assert_eq!(round_amount(dec!(-33.335), 2), dec!(-33.34));
/// ```
pub fn round_amount(amount: Decimal, scale: u32) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(scale);
    rounded
}

/// True when `amount` lies within `epsilon` of zero (inclusive).
pub fn approx_zero(amount: Decimal, epsilon: Decimal) -> bool {
    amount.abs() <= epsilon
}

/// True when `a` and `b` differ by at most `epsilon`.
pub fn approx_eq(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    approx_zero(a - b, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_amount(dec!(0.005), 2), dec!(0.01));
        assert_eq!(round_amount(dec!(-0.005), 2), dec!(-0.01));
        assert_eq!(round_amount(dec!(2.344), 2), dec!(2.34));
        assert_eq!(round_amount(dec!(10), 2), dec!(10));
    }

    #[test]
    fn test_round_pads_to_scale() {
        assert_eq!(round_amount(dec!(30), 2).to_string(), "30.00");
        assert_eq!(round_amount(dec!(-0.004), 2).to_string(), "0.00");
        assert_eq!(round_amount(dec!(12.5), 0).to_string(), "13");
    }

    #[test]
    fn test_epsilon_boundary_is_inclusive() {
        assert!(approx_zero(dec!(0.01), EPSILON));
        assert!(approx_zero(dec!(-0.01), EPSILON));
        assert!(!approx_zero(dec!(0.011), EPSILON));
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(dec!(99.99), dec!(100), EPSILON));
        assert!(!approx_eq(dec!(99.98), dec!(100), EPSILON));
    }
}
