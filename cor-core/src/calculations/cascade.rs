//! Markup and fee cascade.
//!
//! Pricing is layered in a fixed order:
//!
//! 1. Each category subtotal is the exact sum of its line totals.
//! 2. Each category gets its own markup on that subtotal.
//! 3. The COR subtotal is the sum of the marked-up category totals.
//! 4. Insurance, bond and license fees are each taken on the marked-up
//!    COR subtotal, never on the raw line-item subtotal.
//!
//! Reordering these steps changes the total.

use serde::{Deserialize, Serialize};

use crate::models::{BasisPoints, Cents, ChangeOrderRequest, CostCategory};

/// Rates used when a change order leaves a rate unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRates {
    pub labor_markup: BasisPoints,
    pub materials_markup: BasisPoints,
    pub equipment_markup: BasisPoints,
    pub subcontractors_markup: BasisPoints,
    pub liability_insurance: BasisPoints,
    pub bond: BasisPoints,
    pub license_fee: BasisPoints,
}

/// The single source of default rates for display, export and totals.
pub const DEFAULT_RATES: DefaultRates = DefaultRates {
    labor_markup: BasisPoints(1500),
    materials_markup: BasisPoints(1500),
    equipment_markup: BasisPoints(1500),
    subcontractors_markup: BasisPoints(500),
    liability_insurance: BasisPoints(144),
    bond: BasisPoints(100),
    license_fee: BasisPoints(10),
};

/// Markup rate per cost category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupRates {
    pub labor: BasisPoints,
    pub materials: BasisPoints,
    pub equipment: BasisPoints,
    pub subcontractors: BasisPoints,
}

impl MarkupRates {
    /// Resolves a change order's markup rates, filling unset rates from
    /// [`DEFAULT_RATES`]. An explicit zero is kept.
    pub fn resolve(cor: &ChangeOrderRequest) -> Self {
        Self {
            labor: cor.labor_markup_percent.unwrap_or(DEFAULT_RATES.labor_markup),
            materials: cor
                .materials_markup_percent
                .unwrap_or(DEFAULT_RATES.materials_markup),
            equipment: cor
                .equipment_markup_percent
                .unwrap_or(DEFAULT_RATES.equipment_markup),
            subcontractors: cor
                .subcontractors_markup_percent
                .unwrap_or(DEFAULT_RATES.subcontractors_markup),
        }
    }

    pub fn for_category(
        &self,
        category: CostCategory,
    ) -> BasisPoints {
        match category {
            CostCategory::Labor => self.labor,
            CostCategory::Materials => self.materials,
            CostCategory::Equipment => self.equipment,
            CostCategory::Subcontractors => self.subcontractors,
        }
    }
}

/// Fee rates applied to the marked-up COR subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRates {
    pub liability_insurance: BasisPoints,
    pub bond: BasisPoints,
    pub license_fee: BasisPoints,
}

impl FeeRates {
    /// Resolves a change order's fee rates, filling unset rates from
    /// [`DEFAULT_RATES`]. An explicit zero is kept.
    pub fn resolve(cor: &ChangeOrderRequest) -> Self {
        Self {
            liability_insurance: cor
                .liability_insurance_percent
                .unwrap_or(DEFAULT_RATES.liability_insurance),
            bond: cor.bond_percent.unwrap_or(DEFAULT_RATES.bond),
            license_fee: cor.license_fee_percent.unwrap_or(DEFAULT_RATES.license_fee),
        }
    }
}

/// Markup on a category subtotal: `round(subtotal × bp / 10000)`.
pub fn calculate_markup(
    subtotal: Cents,
    markup: BasisPoints,
) -> Cents {
    subtotal.apply_rate(markup)
}

/// Fee on the marked-up COR subtotal: `round(base × bp / 10000)`.
///
/// Same arithmetic as [`calculate_markup`]; kept separate because the base
/// is different.
pub fn calculate_fee(
    base: Cents,
    fee: BasisPoints,
) -> Cents {
    base.apply_rate(fee)
}

/// One category's contribution to the COR subtotal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub subtotal: Cents,
    pub markup_percent: BasisPoints,
    pub markup_amount: Cents,
    /// `subtotal + markup_amount`.
    pub total: Cents,
}

impl CategoryTotals {
    /// Sums line totals exactly and applies the category markup once.
    pub fn from_line_totals(
        line_totals: &[Cents],
        markup_percent: BasisPoints,
    ) -> Self {
        let subtotal: Cents = line_totals.iter().sum();
        let markup_amount = calculate_markup(subtotal, markup_percent);

        Self {
            subtotal,
            markup_percent,
            markup_amount,
            total: subtotal + markup_amount,
        }
    }
}

/// A single fee: the rate used and the resulting amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAmount {
    pub percent: BasisPoints,
    pub amount: Cents,
}

/// The three fees layered on the marked-up COR subtotal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTotals {
    pub liability_insurance: FeeAmount,
    pub bond: FeeAmount,
    pub license_fee: FeeAmount,
}

impl FeeTotals {
    pub fn total(&self) -> Cents {
        self.liability_insurance.amount + self.bond.amount + self.license_fee.amount
    }
}

/// Computes every fee against `cor_subtotal`, the post-markup subtotal.
pub fn calculate_fees(
    cor_subtotal: Cents,
    rates: &FeeRates,
) -> FeeTotals {
    let fee = |percent: BasisPoints| FeeAmount {
        percent,
        amount: calculate_fee(cor_subtotal, percent),
    };

    FeeTotals {
        liability_insurance: fee(rates.liability_insurance),
        bond: fee(rates.bond),
        license_fee: fee(rates.license_fee),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn markup_is_rounded_basis_point_share() {
        assert_eq!(calculate_markup(Cents(200000), BasisPoints(1500)), Cents(30000));
        assert_eq!(calculate_markup(Cents(333), BasisPoints(1500)), Cents(50));
    }

    #[test]
    fn fee_matches_known_values() {
        assert_eq!(calculate_fee(Cents(230000), BasisPoints(144)), Cents(3312));
        assert_eq!(calculate_fee(Cents(230000), BasisPoints(100)), Cents(2300));
        assert_eq!(calculate_fee(Cents(230000), BasisPoints(10)), Cents(230));
    }

    #[test]
    fn resolve_uses_defaults_for_unset_rates() {
        let cor = ChangeOrderRequest::default();

        let markups = MarkupRates::resolve(&cor);
        let fees = FeeRates::resolve(&cor);

        assert_eq!(markups.labor, BasisPoints(1500));
        assert_eq!(markups.materials, BasisPoints(1500));
        assert_eq!(markups.equipment, BasisPoints(1500));
        assert_eq!(markups.subcontractors, BasisPoints(500));
        assert_eq!(fees.liability_insurance, BasisPoints(144));
        assert_eq!(fees.bond, BasisPoints(100));
        assert_eq!(fees.license_fee, BasisPoints(10));
    }

    #[test]
    fn resolve_keeps_explicit_zero() {
        let cor = ChangeOrderRequest {
            labor_markup_percent: Some(BasisPoints::ZERO),
            bond_percent: Some(BasisPoints::ZERO),
            ..Default::default()
        };

        assert_eq!(MarkupRates::resolve(&cor).labor, BasisPoints::ZERO);
        assert_eq!(FeeRates::resolve(&cor).bond, BasisPoints::ZERO);
    }

    #[test]
    fn category_markup_is_taken_on_the_summed_subtotal() {
        // Per-line markup would round 0.5 up three times (3); on the sum it is 1.5 -> 2.
        let totals =
            CategoryTotals::from_line_totals(&[Cents(10), Cents(10), Cents(10)], BasisPoints(500));

        assert_eq!(totals.subtotal, Cents(30));
        assert_eq!(totals.markup_amount, Cents(2));
        assert_eq!(totals.total, Cents(32));
    }

    #[test]
    fn category_totals_empty_category_is_zero() {
        let totals = CategoryTotals::from_line_totals(&[], BasisPoints(1500));

        assert_eq!(totals, CategoryTotals {
            subtotal: Cents::ZERO,
            markup_percent: BasisPoints(1500),
            markup_amount: Cents::ZERO,
            total: Cents::ZERO,
        });
    }

    #[test]
    fn fees_apply_to_given_base() {
        let rates = FeeRates {
            liability_insurance: BasisPoints(144),
            bond: BasisPoints(100),
            license_fee: BasisPoints(10),
        };

        let fees = calculate_fees(Cents(115000), &rates);

        assert_eq!(fees.liability_insurance.amount, Cents(1656));
        assert_eq!(fees.bond.amount, Cents(1150));
        assert_eq!(fees.license_fee.amount, Cents(115));
        assert_eq!(fees.total(), Cents(2921));
    }
}
