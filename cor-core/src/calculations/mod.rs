//! Billing calculation modules.
//!
//! Every calculation here is a pure function over a snapshot of its inputs:
//! no I/O, no caching and no shared state, so callers may recompute many
//! change orders or draws in parallel.

pub mod cascade;
pub mod common;
pub mod cor_totals;
pub mod draw;
pub mod invoice;
pub mod line_items;
pub mod money;

pub use cascade::{
    CategoryTotals, DEFAULT_RATES, DefaultRates, FeeAmount, FeeRates, FeeTotals, MarkupRates,
    calculate_fee, calculate_fees, calculate_markup,
};
pub use cor_totals::{CorTotals, calculate_cor_totals};
pub use draw::{
    DrawChainError, DrawTotals, calculate_draw_totals, clamp_current_percent, next_draw_number,
    verify_draw_chain,
};
pub use invoice::{InvoiceTotals, calculate_invoice_totals, calculate_retention_totals};
pub use line_items::{LaborItemTotal, calculate_labor_item_total, calculate_line_item_total};
pub use money::{
    basis_points_to_percent, cents_to_dollars, dollars_to_cents, format_currency, format_percent,
    percent_to_basis_points,
};
