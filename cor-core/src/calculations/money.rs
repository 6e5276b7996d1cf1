//! Conversion and formatting between integer cents, decimal dollars,
//! integer basis points and decimal percent.
//!
//! Every function here is total. Malformed numeric text degrades to zero
//! and out-of-range numbers saturate (both with a `warn!` trace) so a
//! half-typed form field can never abort a recompute.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{BasisPoints, Cents};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Formats cents as a plain two-decimal dollar string (`12345` -> `"123.45"`).
pub fn cents_to_dollars(cents: Cents) -> String {
    let sign = if cents.0 < 0 { "-" } else { "" };
    let abs = cents.0.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parses a dollar amount typed by a user into cents, rounding to the
/// nearest cent.
///
/// # Arguments
///
/// * `input` - Dollar text as typed, e.g. `"$1,234.50"`
///
/// # Returns
///
/// The amount in cents. Commas, dollar signs and surrounding whitespace
/// are ignored. Empty, partial (`"-"`, `"."`) or otherwise unparseable
/// input yields zero.
///
/// # Examples
///
/// ```
/// use cor_core::Cents;
/// use cor_core::calculations::money::dollars_to_cents;
///
/// assert_eq!(dollars_to_cents("1,234.567"), Cents(123457));
/// assert_eq!(dollars_to_cents("abc"), Cents(0));
/// ```
pub fn dollars_to_cents(input: &str) -> Cents {
    match parse_lenient(input) {
        Some(dollars) => decimal_dollars_to_cents(dollars),
        None => Cents::ZERO,
    }
}

/// Converts an already-parsed dollar amount into cents.
///
/// Amounts beyond the `i64` range saturate at the nearest bound.
pub fn decimal_dollars_to_cents(dollars: Decimal) -> Cents {
    let cents = dollars
        .checked_mul(HUNDRED)
        .map(|scaled| round_half_up(scaled, 0))
        .and_then(|rounded| rounded.to_i64());

    match cents {
        Some(cents) => Cents(cents),
        None => {
            warn!(%dollars, "dollar amount out of range, saturating");
            if dollars.is_sign_negative() {
                Cents(i64::MIN)
            } else {
                Cents(i64::MAX)
            }
        }
    }
}

/// Formats cents as US currency: `"$1,234.56"`, `"-$1,234.56"`.
pub fn format_currency(cents: Cents) -> String {
    let sign = if cents.0 < 0 { "-" } else { "" };
    let abs = cents.0.unsigned_abs();
    format!("{sign}${}.{:02}", group_thousands(abs / 100), abs % 100)
}

/// Formats basis points as an editable percent string with trailing zeros
/// trimmed (`1500` -> `"15"`, `144` -> `"1.44"`, `10` -> `"0.1"`).
pub fn basis_points_to_percent(bp: BasisPoints) -> String {
    Decimal::new(i64::from(bp.0), 2).normalize().to_string()
}

/// Parses a percent string into basis points, rounding to the nearest
/// basis point (`"15"` -> `1500`, `"1.445"` -> `145`).
///
/// # Arguments
///
/// * `input` - Percent text as typed, optionally with `%` or `,`
///
/// # Returns
///
/// The rate in basis points. Empty, partial or non-numeric input yields
/// zero; a number too large for `i32` saturates at the nearest bound so
/// that callers which clamp (draw percents) cap it instead of zeroing it.
pub fn percent_to_basis_points(input: &str) -> BasisPoints {
    let Some(percent) = parse_lenient(input) else {
        return BasisPoints::ZERO;
    };

    let bp = percent
        .checked_mul(HUNDRED)
        .map(|scaled| round_half_up(scaled, 0))
        .and_then(|rounded| rounded.to_i32());

    match bp {
        Some(bp) => BasisPoints(bp),
        None => {
            warn!(%percent, "percent out of range, saturating");
            if percent.is_sign_negative() {
                BasisPoints(i32::MIN)
            } else {
                BasisPoints(i32::MAX)
            }
        }
    }
}

/// Formats basis points as a fixed two-decimal percent (`144` -> `"1.44%"`).
pub fn format_percent(bp: BasisPoints) -> String {
    format!("{}%", Decimal::new(i64::from(bp.0), 2))
}

/// Strips formatting characters and parses what is left.
///
/// Returns `None` for input that has no numeric value yet, such as an
/// empty field or a lone sign. Unparseable text is logged.
fn parse_lenient(input: &str) -> Option<Decimal> {
    let mut cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '$' | '%'))
        .collect();

    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    if matches!(cleaned.as_str(), "" | "-" | "+") {
        return None;
    }
    if let Some(rest) = cleaned.strip_prefix("-.") {
        cleaned = format!("-0.{rest}");
    } else if let Some(rest) = cleaned.strip_prefix('.') {
        cleaned = format!("0.{rest}");
    }

    match Decimal::from_str(&cleaned) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(input = %input, "invalid numeric input, using 0: {}", e);
            None
        }
    }
}

fn group_thousands(mut value: u64) -> String {
    if value < 1000 {
        return value.to_string();
    }
    let mut groups = Vec::new();
    while value >= 1000 {
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.push(value.to_string());
    groups.reverse();
    groups.join(",")
}
