//! Common utility functions for quote calculations.
//!
//! This module provides the rounding rules shared by the pricing engine and
//! its derived scenarios.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Arguments
///
/// * `value` - The decimal value to round
///
/// # Returns
///
/// The value rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    cent_scale(round_half_up_dp(value, 2))
}

/// Pads `value` to at least two decimal places without rounding it.
///
/// Every amount of a quote carries this scale, so serialized figures read
/// `"1100.00"` rather than a mix of `"1100"` and `"1210.00"`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::calculations::common::cent_scale;
///
/// assert_eq!(cent_scale(dec!(1100)).to_string(), "1100.00");
/// assert_eq!(cent_scale(dec!(0.125)).to_string(), "0.125");
/// ```
pub fn cent_scale(value: Decimal) -> Decimal {
    let mut value = value;
    if value.scale() < 2 {
        value.rescale(2);
    }
    value
}

/// Rounds half-up to `dp` decimal places.
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::calculations::common::round_half_up_dp;
///
/// assert_eq!(round_half_up_dp(dec!(6.66666), 1), dec!(6.7));
/// assert_eq!(round_half_up_dp(dec!(12.25), 1), dec!(12.3));
/// ```
pub fn round_half_up_dp(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Multiplies `amount` by `1 + rate`.
pub fn apply_rate(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount * (Decimal::ONE + rate)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46)); // Away from zero
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        let result = round_half_up(dec!(1028.5));

        assert_eq!(result, dec!(1028.50));
    }

    #[test]
    fn round_half_up_handles_repeating_fractions() {
        let result = round_half_up(dec!(1452) / dec!(6));

        assert_eq!(result, dec!(242.00));
    }

    #[test]
    fn round_half_up_always_has_two_decimal_places() {
        assert_eq!(round_half_up(dec!(1210)).to_string(), "1210.00");
        assert_eq!(round_half_up(dec!(1028.5)).to_string(), "1028.50");
        assert_eq!(round_half_up(dec!(1210.000)).to_string(), "1210.00");
    }

    #[test]
    fn round_half_up_dp_rounds_to_one_decimal() {
        let result = round_half_up_dp(dec!(20) / dec!(3), 1);

        assert_eq!(result, dec!(6.7));
    }

    // =========================================================================
    // apply_rate tests
    // =========================================================================

    #[test]
    fn apply_rate_adds_percentage() {
        assert_eq!(apply_rate(dec!(1100), dec!(0.10)), dec!(1210));
    }

    #[test]
    fn apply_rate_zero_is_identity() {
        assert_eq!(apply_rate(dec!(2500), Decimal::ZERO), dec!(2500));
    }
}
