use std::path::PathBuf;

use chrono::NaiveDate;
use cor_core::calculations::{
    calculate_cor_totals, calculate_draw_totals, calculate_invoice_totals,
};
use cor_core::{
    BasisPoints, Cents, ChangeOrderRequest, CostCategory, DrawRequest, DrawStatus, Invoice,
    LineItem, SourceType,
};
use cor_data::report::{render_cor_report, render_draw_report, render_invoice_report};
use cor_data::{load_invoice_lines_from_file, load_line_items_from_file, load_sov_items_from_file};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// =============================================================================
// Change order
// =============================================================================

#[test]
fn change_order_from_csv() {
    let items = load_line_items_from_file(&fixture("cor_line_items.csv")).unwrap();
    assert_eq!(
        items.iter().map(LineItem::category).collect::<Vec<_>>(),
        CostCategory::ALL.to_vec()
    );
    assert!(matches!(
        &items[2],
        LineItem::Equipment(e) if e.source_type == SourceType::Mobilization
    ));

    let mut cor = ChangeOrderRequest {
        cor_number: "COR-001".to_string(),
        title: "Closet framing".to_string(),
        scope_of_work: "Frame and firestop two closets".to_string(),
        ..Default::default()
    };
    for item in items {
        cor.push_line_item(item);
    }

    let totals = calculate_cor_totals(&cor);

    assert_eq!(totals.labor.total, Cents(230000));
    assert_eq!(totals.materials.total, Cents(115000));
    assert_eq!(totals.equipment.total, Cents(57500));
    assert_eq!(totals.subcontractors.total, Cents(105000));
    assert_eq!(totals.cor_subtotal, Cents(507500));
    assert_eq!(totals.fees.liability_insurance.amount, Cents(7308));
    assert_eq!(totals.fees.bond.amount, Cents(5075));
    assert_eq!(totals.fees.license_fee.amount, Cents(508));
    assert_eq!(totals.cor_total, Cents(520391));

    let report = render_cor_report(&cor, &totals);
    assert!(report.contains("$5,203.91"), "{report}");
}

// =============================================================================
// Draw request
// =============================================================================

#[test]
fn draw_from_csv() {
    let items = load_sov_items_from_file(&fixture("sov.csv")).unwrap();
    let draw = DrawRequest {
        id: 0,
        project_id: 1,
        draw_number: 4,
        period_start: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        period_end: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
        retention_percent: BasisPoints(1000),
        previous_retention: Cents(836_000),
        status: DrawStatus::Draft,
        items,
    };

    // Concrete asked for 20% on top of 92%: only 8% remains.
    assert_eq!(draw.items[1].current_percent, BasisPoints(800));

    let totals = calculate_draw_totals(&draw);

    assert_eq!(totals.scheduled_total, Cents(10_500_000));
    assert_eq!(totals.previous_total, Cents(8_360_000));
    assert_eq!(totals.current_total, Cents(1_140_000));
    assert_eq!(totals.completed_total, Cents(9_500_000));
    assert_eq!(totals.percent_complete, BasisPoints(9048));
    assert_eq!(totals.total_retention, Cents(950_000));
    assert_eq!(totals.current_retention_change, Cents(114_000));
    assert_eq!(totals.payment_due, Cents(1_026_000));
    assert_eq!(totals.balance_to_finish, Cents(1_000_000));

    let report = render_draw_report(&draw, &totals);
    assert!(report.contains("Draw #4  2025-04-01 to 2025-04-30"), "{report}");
    assert!(report.contains("$10,260.00"), "{report}");
}

// =============================================================================
// Invoice
// =============================================================================

#[test]
fn invoice_from_csv() {
    let invoice = Invoice {
        invoice_number: "INV-0007".to_string(),
        retention_percent: BasisPoints(1000),
        line_items: load_invoice_lines_from_file(&fixture("invoice_lines.csv")).unwrap(),
        ..Default::default()
    };

    let totals = calculate_invoice_totals(&invoice);

    assert_eq!(totals.subtotal, Cents(500000));
    assert_eq!(totals.retention_amount, Cents(50000));
    assert_eq!(totals.total, Cents(450000));

    let report = render_invoice_report(&invoice, &totals);
    assert!(report.contains("TM-118"), "{report}");
    assert!(report.contains("$4,500.00"), "{report}");
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load_line_items_from_file(&fixture("no_such_file.csv"));

    assert!(matches!(result, Err(cor_data::CsvLoadError::Io(_))));
}
