//! Unit-safe numeric types for money and rates.
//!
//! Money is always an integer number of cents and rates are always an
//! integer number of basis points (1 bp = 0.01%). The two never mix through
//! an operator: the only bridge is [`Cents::apply_rate`].
//!
//! Arithmetic saturates at the bounds of the underlying integer instead of
//! panicking or wrapping, so a corrupt input can never abort a recompute.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::calculations::money::{format_currency, format_percent};

/// Basis points in one hundred percent.
pub const BASIS_POINTS_PER_WHOLE: i32 = 10_000;

/// An amount of money in integer cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Applies a basis-point rate: `round(cents * bp / 10000)`.
    ///
    /// The product is computed in 128-bit integers, so there is no
    /// intermediate precision loss. Halves round away from zero.
    ///
    /// ```
    /// use cor_core::{BasisPoints, Cents};
    ///
    /// assert_eq!(Cents(230000).apply_rate(BasisPoints(144)), Cents(3312));
    /// assert_eq!(Cents(5).apply_rate(BasisPoints(1000)), Cents(1)); // 0.5 rounds up
    /// ```
    pub fn apply_rate(
        self,
        rate: BasisPoints,
    ) -> Cents {
        let product = i128::from(self.0) * i128::from(rate.0);
        let rounded = div_round_half_away(product, i128::from(BASIS_POINTS_PER_WHOLE));
        Cents(i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX }))
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(
        self,
        rhs: Cents,
    ) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(
        &mut self,
        rhs: Cents,
    ) {
        *self = *self + rhs;
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(
        self,
        rhs: Cents,
    ) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Cents {
    fn sub_assign(
        &mut self,
        rhs: Cents,
    ) {
        *self = *self - rhs;
    }
}

impl Neg for Cents {
    type Output = Cents;

    fn neg(self) -> Cents {
        Cents(self.0.saturating_neg())
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Cents> for Cents {
    fn sum<I: Iterator<Item = &'a Cents>>(iter: I) -> Cents {
        iter.copied().sum()
    }
}

impl fmt::Display for Cents {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&format_currency(*self))
    }
}

/// A rate in integer basis points (1500 = 15.00%).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(pub i32);

impl BasisPoints {
    pub const ZERO: BasisPoints = BasisPoints(0);
    pub const ONE_HUNDRED_PERCENT: BasisPoints = BasisPoints(BASIS_POINTS_PER_WHOLE);

    pub const fn new(bp: i32) -> Self {
        Self(bp)
    }

    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Add for BasisPoints {
    type Output = BasisPoints;

    fn add(
        self,
        rhs: BasisPoints,
    ) -> BasisPoints {
        BasisPoints(self.0.saturating_add(rhs.0))
    }
}

impl Sub for BasisPoints {
    type Output = BasisPoints;

    fn sub(
        self,
        rhs: BasisPoints,
    ) -> BasisPoints {
        BasisPoints(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for BasisPoints {
    fn sum<I: Iterator<Item = BasisPoints>>(iter: I) -> BasisPoints {
        iter.fold(BasisPoints::ZERO, Add::add)
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&format_percent(*self))
    }
}

/// Integer division rounding halves away from zero.
pub(crate) fn div_round_half_away(
    numerator: i128,
    denominator: i128,
) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        if (numerator < 0) != (denominator < 0) {
            quotient - 1
        } else {
            quotient + 1
        }
    } else {
        quotient
    }
}
