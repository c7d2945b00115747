//! Common helpers shared by the pricing calculations.
//!
//! Prices in the reference tables are quoted per quintal while every
//! derived figure is per kilogram, so unit conversion lives here next to
//! the output rounding rule.

use rust_decimal::{Decimal, RoundingStrategy};

/// Kilograms in one quintal, the unit MSP and market prices are quoted in.
pub const KG_PER_QUINTAL: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero. Applying the
/// function twice yields the same value as applying it once.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use crop_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(27.004)), dec!(27.00));
/// assert_eq!(round_half_up(dec!(27.005)), dec!(27.01));
/// assert_eq!(round_half_up(dec!(-27.005)), dec!(-27.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a price per quintal into a price per kilogram.
///
/// ```
/// use rust_decimal_macros::dec;
/// use crop_core::calculations::common::per_kg;
///
/// assert_eq!(per_kg(dec!(2585)), dec!(25.85));
/// assert_eq!(per_kg(dec!(783.36)), dec!(7.8336));
/// ```
pub fn per_kg(price_per_quintal: Decimal) -> Decimal {
    price_per_quintal / KG_PER_QUINTAL
}
