//! Common utility functions for billing calculations.
//!
//! This module provides shared rounding and clamping helpers used by the
//! line-item rules, the primitives and the draw engine.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::models::Cents;

/// Rounds a decimal value to `dp` decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at
/// exactly the midpoint are rounded away from zero.
///
/// # Arguments
///
/// * `value` - The decimal value to round
/// * `dp` - Number of decimal places to keep
///
/// # Returns
///
/// The value rounded to `dp` decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cor_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
/// assert_eq!(round_half_up(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_half_up(dec!(-2.5), 0), dec!(-3)); // Away from zero
/// ```
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cor_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-1.5), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(40), dec!(0)), dec!(40));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Multiplies a fractional quantity by a per-unit rate in cents and rounds
/// the product to a whole cent.
///
/// # Arguments
///
/// * `quantity` - Hours or units, possibly fractional
/// * `rate` - Cents per hour or per unit
///
/// # Returns
///
/// The extended amount in cents. Negative quantities and negative rates
/// contribute nothing; a product beyond the `i64` range saturates at
/// `i64::MAX`.
pub fn extend_cents(
    quantity: Decimal,
    rate: Cents,
) -> Cents {
    let quantity = max(quantity, Decimal::ZERO);
    let rate = Decimal::from(rate.0.max(0));

    let cents = quantity
        .checked_mul(rate)
        .map(|product| round_half_up(product, 0))
        .and_then(|rounded| rounded.to_i64());

    match cents {
        Some(cents) => Cents(cents),
        None => {
            warn!(%quantity, %rate, "line amount out of range, saturating");
            Cents(i64::MAX)
        }
    }
}
