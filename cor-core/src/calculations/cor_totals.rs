//! COR totals aggregation.
//!
//! [`calculate_cor_totals`] composes the line-item rules and the markup/fee
//! cascade into every figure the form, the export layer and the totals
//! cache need. It takes a full snapshot of the change order and returns a
//! full snapshot of the totals; it keeps no state between calls.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cor_core::{Cents, ChangeOrderRequest, LaborItem};
//! use cor_core::calculations::calculate_cor_totals;
//!
//! let cor = ChangeOrderRequest {
//!     title: "Added blocking".to_string(),
//!     change_order_labor: vec![LaborItem {
//!         labor_class: "Carpenter".to_string(),
//!         regular_hours: dec!(40),
//!         regular_rate: Cents(5000),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let totals = calculate_cor_totals(&cor);
//!
//! assert_eq!(totals.labor.total, Cents(230000));
//! assert_eq!(totals.cor_total, Cents(235842));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::cascade::{
    CategoryTotals, FeeRates, FeeTotals, MarkupRates, calculate_fees,
};
use crate::models::{Cents, ChangeOrderRequest, CostCategory};

/// Every derived figure of a change order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorTotals {
    pub labor: CategoryTotals,
    pub materials: CategoryTotals,
    pub equipment: CategoryTotals,
    pub subcontractors: CategoryTotals,

    /// Sum of the four marked-up category totals.
    pub cor_subtotal: Cents,

    pub fees: FeeTotals,

    /// `cor_subtotal` plus all fees.
    pub cor_total: Cents,
}

impl CorTotals {
    pub fn category(
        &self,
        category: CostCategory,
    ) -> &CategoryTotals {
        match category {
            CostCategory::Labor => &self.labor,
            CostCategory::Materials => &self.materials,
            CostCategory::Equipment => &self.equipment,
            CostCategory::Subcontractors => &self.subcontractors,
        }
    }

    pub fn fee_total(&self) -> Cents {
        self.fees.total()
    }

    /// Raw line-item cost before any markup.
    pub fn direct_cost(&self) -> Cents {
        CostCategory::ALL
            .iter()
            .map(|c| self.category(*c).subtotal)
            .sum()
    }
}

/// Computes all COR totals from the line items and rate fields.
///
/// Empty categories contribute zero. The input is only borrowed, so the
/// change order and its line items are never modified.
pub fn calculate_cor_totals(cor: &ChangeOrderRequest) -> CorTotals {
    let markups = MarkupRates::resolve(cor);
    let fee_rates = FeeRates::resolve(cor);

    let category = |c: CostCategory| {
        CategoryTotals::from_line_totals(&cor.line_totals(c), markups.for_category(c))
    };

    let labor = category(CostCategory::Labor);
    let materials = category(CostCategory::Materials);
    let equipment = category(CostCategory::Equipment);
    let subcontractors = category(CostCategory::Subcontractors);

    let cor_subtotal = labor.total + materials.total + equipment.total + subcontractors.total;
    let fees = calculate_fees(cor_subtotal, &fee_rates);
    let cor_total = cor_subtotal + fees.total();

    debug!(
        cor_number = %cor.cor_number,
        cor_subtotal = cor_subtotal.0,
        fees = fees.total().0,
        cor_total = cor_total.0,
        "calculated COR totals"
    );

    CorTotals {
        labor,
        materials,
        equipment,
        subcontractors,
        cor_subtotal,
        fees,
        cor_total,
    }
}
