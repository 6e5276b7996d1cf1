//! Per-category rules that turn a line item's inputs into a line total.
//!
//! | Category       | Rule                                                        |
//! |----------------|-------------------------------------------------------------|
//! | Labor          | round(regular hours × rate) + round(overtime hours × rate) |
//! | Materials      | round(quantity × unit cost)                                 |
//! | Equipment      | round(quantity × unit cost)                                 |
//! | Subcontractors | entered amount                                              |
//!
//! Inputs are taken by value and nothing is cached, so the rules can be
//! called in any order on every edit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::extend_cents;
use crate::models::Cents;

/// Result of the labor rule with both portions kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborItemTotal {
    pub regular_total: Cents,
    pub overtime_total: Cents,
    pub total: Cents,
}

/// Prices a labor line. Each portion is rounded to a whole cent before the
/// two are added. Negative hours or rates count as zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use cor_core::Cents;
/// use cor_core::calculations::line_items::calculate_labor_item_total;
///
/// let result = calculate_labor_item_total(dec!(40), dec!(0), Cents(5000), Cents(7500));
/// assert_eq!(result.total, Cents(200000));
/// ```
pub fn calculate_labor_item_total(
    regular_hours: Decimal,
    overtime_hours: Decimal,
    regular_rate: Cents,
    overtime_rate: Cents,
) -> LaborItemTotal {
    let regular_total = extend_cents(regular_hours, regular_rate);
    let overtime_total = extend_cents(overtime_hours, overtime_rate);

    LaborItemTotal {
        regular_total,
        overtime_total,
        total: regular_total + overtime_total,
    }
}

/// Prices a material or equipment line: `round(quantity × unit cost)`.
pub fn calculate_line_item_total(
    quantity: Decimal,
    unit_cost: Cents,
) -> Cents {
    extend_cents(quantity, unit_cost)
}
