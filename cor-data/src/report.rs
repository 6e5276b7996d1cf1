//! Plain-text reports for the terminal.
//!
//! Each renderer takes a model and the totals computed for it, so callers
//! decide when to recompute. Money goes through
//! [`format_currency`] and rates through [`format_percent`].

use cor_core::calculations::{
    CategoryTotals, CorTotals, DrawTotals, FeeAmount, InvoiceTotals, format_currency,
    format_percent,
};
use cor_core::{
    ChangeOrderRequest, CostCategory, DrawRequest, Invoice, InvoiceLineSource, validate_cor,
};

const RULE: &str =
    "--------------------------------------------------------------------------------";

fn category_label(category: CostCategory) -> &'static str {
    match category {
        CostCategory::Labor => "Labor",
        CostCategory::Materials => "Materials",
        CostCategory::Equipment => "Equipment",
        CostCategory::Subcontractors => "Subcontractors",
    }
}

fn category_row(
    label: &str,
    totals: &CategoryTotals,
) -> String {
    format!(
        "{:<16}{:>16}{:>10}{:>16}{:>16}",
        label,
        format_currency(totals.subtotal),
        format_percent(totals.markup_percent),
        format_currency(totals.markup_amount),
        format_currency(totals.total),
    )
}

fn fee_row(
    label: &str,
    fee: &FeeAmount,
) -> String {
    format!(
        "{:<32}{:>10}{:>32}",
        label,
        format_percent(fee.percent),
        format_currency(fee.amount),
    )
}

fn summary_row(
    label: &str,
    value: String,
) -> String {
    format!("{label:<42}{value:>32}")
}

/// Category breakdown, fees and total of a change order, followed by any
/// submission problems.
pub fn render_cor_report(
    cor: &ChangeOrderRequest,
    totals: &CorTotals,
) -> String {
    let mut lines = vec![
        format!("{}  {}", cor.cor_number, cor.title),
        format!("Status: {}", cor.status),
        RULE.to_string(),
        format!(
            "{:<16}{:>16}{:>10}{:>16}{:>16}",
            "Category", "Subtotal", "Markup", "Markup amt", "Total"
        ),
    ];

    for category in CostCategory::ALL {
        lines.push(category_row(
            category_label(category),
            totals.category(category),
        ));
    }

    lines.push(RULE.to_string());
    lines.push(summary_row("COR subtotal", format_currency(totals.cor_subtotal)));
    lines.push(fee_row("Liability insurance", &totals.fees.liability_insurance));
    lines.push(fee_row("Bond", &totals.fees.bond));
    lines.push(fee_row("License fee", &totals.fees.license_fee));
    lines.push(summary_row("COR total", format_currency(totals.cor_total)));

    let validation = validate_cor(cor);
    if !validation.valid {
        lines.push(String::new());
        lines.push("Not ready to submit:".to_string());
        lines.extend(validation.errors.iter().map(|e| format!("  - {e}")));
    }

    lines.join("\n") + "\n"
}

/// G703-style continuation sheet followed by the G702-style summary.
pub fn render_draw_report(
    draw: &DrawRequest,
    totals: &DrawTotals,
) -> String {
    let mut lines = vec![
        format!(
            "Draw #{}  {} to {}  ({})",
            draw.draw_number, draw.period_start, draw.period_end, draw.status
        ),
        RULE.to_string(),
        format!(
            "{:<4} {:<24}{:>14}{:>9}{:>9}{:>14}",
            "#", "Description", "Scheduled", "Prev", "This", "Balance"
        ),
    ];

    for item in &draw.items {
        lines.push(format!(
            "{:<4} {:<24}{:>14}{:>9}{:>9}{:>14}",
            item.line_number,
            item.description,
            format_currency(item.scheduled_value),
            format_percent(item.previous_percent),
            format_percent(item.current_percent),
            format_currency(item.balance_to_finish()),
        ));
    }

    lines.push(RULE.to_string());
    lines.push(summary_row(
        "Original contract sum",
        format_currency(totals.scheduled_total),
    ));
    lines.push(summary_row(
        "Previously billed",
        format_currency(totals.previous_total),
    ));
    lines.push(summary_row("This period", format_currency(totals.current_total)));
    lines.push(summary_row(
        "Completed to date",
        format!(
            "{} ({})",
            format_currency(totals.completed_total),
            format_percent(totals.percent_complete)
        ),
    ));
    lines.push(summary_row(
        &format!("Retention held ({})", format_percent(totals.retention_percent)),
        format_currency(totals.total_retention),
    ));
    lines.push(summary_row(
        "Less previous retention",
        format_currency(totals.previous_retention),
    ));
    lines.push(summary_row(
        "Retention change",
        format_currency(totals.current_retention_change),
    ));
    lines.push(summary_row("Payment due", format_currency(totals.payment_due)));
    lines.push(summary_row(
        "Balance to finish",
        format_currency(totals.balance_to_finish),
    ));

    lines.join("\n") + "\n"
}

/// Invoice lines with the retention summary.
pub fn render_invoice_report(
    invoice: &Invoice,
    totals: &InvoiceTotals,
) -> String {
    let mut lines = vec![format!("Invoice {}", invoice.invoice_number), RULE.to_string()];

    for line in &invoice.line_items {
        let reference = match &line.source {
            InvoiceLineSource::ChangeOrder { cor_number } => cor_number.as_str(),
            InvoiceLineSource::Ticket { ticket_number } => ticket_number.as_str(),
            InvoiceLineSource::Manual => "manual",
        };
        lines.push(format!(
            "{:<12}{:<46}{:>16}",
            reference,
            line.description,
            format_currency(line.amount)
        ));
    }

    lines.push(RULE.to_string());
    lines.push(summary_row("Subtotal", format_currency(totals.subtotal)));
    lines.push(summary_row(
        &format!("Retention ({})", format_percent(totals.retention_percent)),
        format_currency(-totals.retention_amount),
    ));
    lines.push(summary_row("Total due", format_currency(totals.total)));

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use cor_core::calculations::{
        calculate_cor_totals, calculate_draw_totals, calculate_invoice_totals,
    };
    use cor_core::{BasisPoints, Cents, InvoiceLineItem, LaborItem, ScheduleOfValuesLine};
    use rust_decimal_macros::dec;

    use super::*;

    fn framing_cor() -> ChangeOrderRequest {
        ChangeOrderRequest {
            cor_number: "COR-003".to_string(),
            title: "Added blocking".to_string(),
            scope_of_work: "Blocking for owner-furnished TVs".to_string(),
            change_order_labor: vec![LaborItem {
                labor_class: "Carpenter".to_string(),
                regular_hours: dec!(40),
                regular_rate: Cents(5000),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn cor_report_shows_cascade() {
        let cor = framing_cor();

        let report = render_cor_report(&cor, &calculate_cor_totals(&cor));

        assert!(report.starts_with("COR-003  Added blocking\nStatus: draft\n"));
        assert!(report.contains("$2,000.00"), "{report}");
        assert!(report.contains("15.00%"), "{report}");
        assert!(report.contains("$2,300.00"), "{report}");
        assert!(report.contains("1.44%"), "{report}");
        assert!(report.contains("$33.12"), "{report}");
        assert!(report.contains("$2,358.42"), "{report}");
        assert!(!report.contains("Not ready to submit"));
    }

    #[test]
    fn cor_report_lists_submission_problems() {
        let cor = ChangeOrderRequest {
            scope_of_work: String::new(),
            ..framing_cor()
        };

        let report = render_cor_report(&cor, &calculate_cor_totals(&cor));

        assert!(report.contains("Not ready to submit:\n  - Scope of work is required.\n"));
    }

    #[test]
    fn draw_report_shows_summary() {
        let schedule = [ScheduleOfValuesLine {
            id: 1,
            line_number: 1,
            description: "Site work".to_string(),
            area: None,
            scheduled_value: Cents(1_000_000),
        }];
        let mut draw = DrawRequest::first(
            1,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            BasisPoints(1000),
            &schedule,
        );
        draw.items[0] = draw.items[0].with_current_percent_input("40");

        let report = render_draw_report(&draw, &calculate_draw_totals(&draw));

        assert!(report.starts_with("Draw #1  2025-01-01 to 2025-01-31  (draft)\n"));
        assert!(report.contains("$4,000.00 (40.00%)"), "{report}");
        assert!(report.contains("Retention held (10.00%)"), "{report}");
        assert!(report.contains("$3,600.00"), "{report}");
        assert!(report.contains("$6,000.00"), "{report}");
    }

    #[test]
    fn invoice_report_withholds_retention() {
        let invoice = Invoice {
            invoice_number: "INV-0042".to_string(),
            retention_percent: BasisPoints(1000),
            line_items: vec![
                InvoiceLineItem::change_order("COR-003", "Added blocking", Cents(235842)),
                InvoiceLineItem::manual("Permit fee", "264.158"),
            ],
            ..Default::default()
        };

        let report = render_invoice_report(&invoice, &calculate_invoice_totals(&invoice));

        assert!(report.contains("COR-003"), "{report}");
        assert!(report.contains("manual"), "{report}");
        assert!(report.contains("$2,622.58"), "{report}");
        assert!(report.contains("-$262.26"), "{report}");
        assert!(report.contains("$2,360.32"), "{report}");
    }
}
