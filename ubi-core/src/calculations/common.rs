//! Rounding and comparison helpers shared by the tax and clawback
//! calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use ubi_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to whole currency units, half-up.
///
/// This is the convention for clawback amounts and pay-period figures:
/// 16129.5 becomes 16130, 16129.49 becomes 16129.
///
/// ```
/// use rust_decimal_macros::dec;
/// use ubi_core::calculations::common::round_whole_units;
///
/// assert_eq!(round_whole_units(dec!(16129.5)), dec!(16130));
/// assert_eq!(round_whole_units(dec!(16129.49)), dec!(16129));
/// ```
pub fn round_whole_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use ubi_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
