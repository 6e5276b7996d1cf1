//! Invoice retention: subtotal, amount withheld, net due.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{BasisPoints, Cents, Invoice, InvoiceLineItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Cents,
    pub retention_percent: BasisPoints,
    pub retention_amount: Cents,
    /// `subtotal - retention_amount`.
    pub total: Cents,
}

/// Sums the lines and withholds `round(subtotal × retention / 10000)`.
pub fn calculate_retention_totals(
    retention_percent: BasisPoints,
    lines: &[InvoiceLineItem],
) -> InvoiceTotals {
    let subtotal: Cents = lines.iter().map(|l| l.amount).sum();
    let retention_amount = subtotal.apply_rate(retention_percent);

    InvoiceTotals {
        subtotal,
        retention_percent,
        retention_amount,
        total: subtotal - retention_amount,
    }
}

pub fn calculate_invoice_totals(invoice: &Invoice) -> InvoiceTotals {
    let totals = calculate_retention_totals(invoice.retention_percent, &invoice.line_items);
    debug!(
        invoice_number = %invoice.invoice_number,
        subtotal = totals.subtotal.0,
        retention = totals.retention_amount.0,
        "calculated invoice totals"
    );
    totals
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ten_percent_retention() {
        let lines = vec![InvoiceLineItem::manual("Progress billing", "5000.00")];

        let totals = calculate_retention_totals(BasisPoints(1000), &lines);

        assert_eq!(totals.subtotal, Cents(500000));
        assert_eq!(totals.retention_amount, Cents(50000));
        assert_eq!(totals.total, Cents(450000));
    }

    #[test]
    fn mixes_cor_ticket_and_manual_lines() {
        let invoice = Invoice {
            invoice_number: "INV-1042".to_string(),
            retention_percent: BasisPoints(500),
            line_items: vec![
                InvoiceLineItem::change_order("COR-003", "Added blocking", Cents(235842)),
                InvoiceLineItem::ticket("TM-118", "Cleanup after storm", Cents(61250)),
                InvoiceLineItem::manual("Permit reimbursement", "$1,200.5"),
            ],
            ..Default::default()
        };

        let totals = calculate_invoice_totals(&invoice);

        assert_eq!(totals.subtotal, Cents(235842 + 61250 + 120050));
        // 417142 * 5% = 20857.1
        assert_eq!(totals.retention_amount, Cents(20857));
        assert_eq!(totals.total, Cents(396285));
    }

    #[test]
    fn no_lines_no_retention() {
        let totals = calculate_retention_totals(BasisPoints(1000), &[]);

        assert_eq!(totals, InvoiceTotals {
            retention_percent: BasisPoints(1000),
            ..Default::default()
        });
    }

    #[test]
    fn unparseable_manual_amount_counts_as_zero() {
        let line = InvoiceLineItem::manual("Misc", "n/a");

        assert_eq!(line.amount, Cents::ZERO);
    }
}
