//! CSV import for change order line items, schedule-of-values rows and
//! invoice lines.
//!
//! Headers are matched by name, so column order does not matter. Money
//! columns are entered in dollars (`1250.00`) and converted to cents;
//! percent columns are entered in percent (`12.5`) and converted to basis
//! points. Empty cells are treated as zero. Money and percent cells may
//! carry `$`, `,` or `%`; hours and quantities must be plain numbers.
//!
//! ## Line items
//!
//! | Column           | Used by                       | Type    |
//! |------------------|-------------------------------|---------|
//! | `category`       | all (required)                | `labor`, `material`, `equipment`, `subcontractor` |
//! | `description`    | all                           | string  |
//! | `labor_class`    | labor                         | string  |
//! | `regular_hours`  | labor                         | decimal |
//! | `overtime_hours` | labor                         | decimal |
//! | `regular_rate`   | labor                         | dollars |
//! | `overtime_rate`  | labor                         | dollars |
//! | `quantity`       | material, equipment           | decimal |
//! | `unit`           | material, equipment           | string  |
//! | `unit_cost`      | material, equipment           | dollars |
//! | `company_name`   | subcontractor                 | string  |
//! | `amount`         | subcontractor                 | dollars |
//! | `source_type`    | material, equipment, subcontractor | `backup_sheet`, `invoice`, `mobilization`, `custom` |
//!
//! ```csv
//! category,description,labor_class,regular_hours,regular_rate,quantity,unit,unit_cost
//! labor,Frame soffit,Carpenter,40,50.00,,,
//! material,Metal studs,,,,120,ea,4.85
//! ```
//!
//! ## Schedule of values
//!
//! `id,line_number,description,area,scheduled_value,previous_percent,previous_amount,current_percent`
//!
//! ## Invoice lines
//!
//! `source,reference,description,amount` where `source` is `cor`, `ticket`
//! or `manual`.

use std::path::Path;
use std::str::FromStr;

use cor_core::calculations::money::{dollars_to_cents, percent_to_basis_points};
use cor_core::{
    CostCategory, EquipmentItem, InvoiceLineItem, LaborItem, LineItem, MaterialItem, SourceType,
    SovItem, SubcontractorItem,
};
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LineItemRow {
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    labor_class: String,
    #[serde(default)]
    regular_hours: String,
    #[serde(default)]
    overtime_hours: String,
    #[serde(default)]
    regular_rate: String,
    #[serde(default)]
    overtime_rate: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    unit_cost: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    amount: String,
    #[serde(default)]
    source_type: String,
}

#[derive(Debug, Deserialize)]
struct SovRow {
    id: i64,
    line_number: u32,
    description: String,
    #[serde(default)]
    area: String,
    scheduled_value: String,
    #[serde(default)]
    previous_percent: String,
    #[serde(default)]
    previous_amount: String,
    #[serde(default)]
    current_percent: String,
}

#[derive(Debug, Deserialize)]
struct InvoiceRow {
    source: String,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    amount: String,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read CSV file: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `category` cell is not one of the four cost categories.
    #[error("unrecognised category '{value}' on row {row}")]
    InvalidCategory { value: String, row: usize },

    /// A `source_type` cell is not a known price source.
    #[error("unrecognised source type '{value}' on row {row}")]
    InvalidSourceType { value: String, row: usize },

    /// An hours or quantity cell is not a number.
    #[error("invalid {column} '{value}' on row {row}")]
    InvalidNumber {
        column: &'static str,
        value: String,
        row: usize,
    },

    /// An invoice `source` cell is not `cor`, `ticket` or `manual`.
    #[error("unrecognised invoice line source '{value}' on row {row}")]
    InvalidInvoiceSource { value: String, row: usize },
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

/// Parses an hours or quantity cell; empty means zero.
fn number(
    column: &'static str,
    value: &str,
    row: usize,
) -> Result<Decimal, CsvLoadError> {
    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(value).map_err(|_| CsvLoadError::InvalidNumber {
        column,
        value: value.to_string(),
        row,
    })
}

fn convert_line_item(
    row: LineItemRow,
    row_number: usize,
) -> Result<LineItem, CsvLoadError> {
    let category =
        CostCategory::parse(&row.category).ok_or_else(|| CsvLoadError::InvalidCategory {
            value: row.category.clone(),
            row: row_number,
        })?;
    let source_type =
        SourceType::parse(&row.source_type).ok_or_else(|| CsvLoadError::InvalidSourceType {
            value: row.source_type.clone(),
            row: row_number,
        })?;

    let item = match category {
        CostCategory::Labor => LineItem::Labor(LaborItem {
            regular_hours: number("regular_hours", &row.regular_hours, row_number)?,
            overtime_hours: number("overtime_hours", &row.overtime_hours, row_number)?,
            regular_rate: dollars_to_cents(&row.regular_rate),
            overtime_rate: dollars_to_cents(&row.overtime_rate),
            labor_class: row.labor_class,
            description: row.description,
        }),
        CostCategory::Materials => LineItem::Material(MaterialItem {
            quantity: number("quantity", &row.quantity, row_number)?,
            unit_cost: dollars_to_cents(&row.unit_cost),
            description: row.description,
            unit: row.unit,
            source_type,
        }),
        CostCategory::Equipment => LineItem::Equipment(EquipmentItem {
            quantity: number("quantity", &row.quantity, row_number)?,
            unit_cost: dollars_to_cents(&row.unit_cost),
            description: row.description,
            unit: row.unit,
            source_type,
        }),
        CostCategory::Subcontractors => LineItem::Subcontractor(SubcontractorItem {
            amount: dollars_to_cents(&row.amount),
            company_name: row.company_name,
            description: row.description,
            source_type,
        }),
    };

    Ok(item)
}

fn convert_sov(row: SovRow) -> SovItem {
    let item = SovItem {
        id: row.id,
        line_number: row.line_number,
        description: row.description,
        area: Some(row.area).filter(|a| !a.is_empty()),
        scheduled_value: dollars_to_cents(&row.scheduled_value),
        previous_percent: percent_to_basis_points(&row.previous_percent),
        previous_amount: dollars_to_cents(&row.previous_amount),
        ..Default::default()
    };

    if row.current_percent.is_empty() {
        item
    } else {
        item.with_current_percent_input(&row.current_percent)
    }
}

fn convert_invoice_line(
    row: InvoiceRow,
    row_number: usize,
) -> Result<InvoiceLineItem, CsvLoadError> {
    match row.source.trim().to_ascii_lowercase().as_str() {
        "cor" | "change_order" => Ok(InvoiceLineItem::change_order(
            row.reference,
            row.description,
            dollars_to_cents(&row.amount),
        )),
        "ticket" => Ok(InvoiceLineItem::ticket(
            row.reference,
            row.description,
            dollars_to_cents(&row.amount),
        )),
        "manual" => Ok(InvoiceLineItem::manual(row.description, &row.amount)),
        _ => Err(CsvLoadError::InvalidInvoiceSource {
            value: row.source,
            row: row_number,
        }),
    }
}

// ---------------------------------------------------------------------------
// Core loaders
// ---------------------------------------------------------------------------

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes())
}

/// Parse line-item CSV text. Rows are returned in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid or a field
///   cannot be deserialised.
/// * [`CsvLoadError::InvalidCategory`] / [`CsvLoadError::InvalidSourceType`]
///   for unknown codes; `row` is 1-based, header excluded.
pub fn load_line_items_from_str(input: &str) -> Result<Vec<LineItem>, CsvLoadError> {
    reader(input)
        .deserialize::<LineItemRow>()
        .enumerate()
        .map(|(idx, result)| convert_line_item(result?, idx + 1))
        .collect()
}

/// Parse schedule-of-values CSV text into draw items, clamping any
/// `current_percent` entry.
pub fn load_sov_items_from_str(input: &str) -> Result<Vec<SovItem>, CsvLoadError> {
    reader(input)
        .deserialize::<SovRow>()
        .map(|result| Ok(convert_sov(result?)))
        .collect()
}

/// Parse invoice-line CSV text.
pub fn load_invoice_lines_from_str(input: &str) -> Result<Vec<InvoiceLineItem>, CsvLoadError> {
    reader(input)
        .deserialize::<InvoiceRow>()
        .enumerate()
        .map(|(idx, result)| convert_invoice_line(result?, idx + 1))
        .collect()
}

/// Read a file from disk and delegate to [`load_line_items_from_str`].
pub fn load_line_items_from_file(path: &Path) -> Result<Vec<LineItem>, CsvLoadError> {
    load_line_items_from_str(&std::fs::read_to_string(path)?)
}

/// Read a file from disk and delegate to [`load_sov_items_from_str`].
pub fn load_sov_items_from_file(path: &Path) -> Result<Vec<SovItem>, CsvLoadError> {
    load_sov_items_from_str(&std::fs::read_to_string(path)?)
}

/// Read a file from disk and delegate to [`load_invoice_lines_from_str`].
pub fn load_invoice_lines_from_file(path: &Path) -> Result<Vec<InvoiceLineItem>, CsvLoadError> {
    load_invoice_lines_from_str(&std::fs::read_to_string(path)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use cor_core::{BasisPoints, Cents, InvoiceLineSource};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const LINE_ITEMS_CSV: &str = "\
category,description,labor_class,regular_hours,overtime_hours,regular_rate,overtime_rate,quantity,unit,unit_cost,company_name,amount,source_type
labor,Frame soffit,Carpenter,40,2.5,50.00,75.00,,,,,,
material,Metal studs,,,,,,120,ea,4.85,,,invoice
equipment,Scissor lift,,,,,,3,day,275.00,,,custom
subcontractor,Fire caulk,,,,,,,,,Seal-Tite LLC,1250.00,backup_sheet
";

    #[test]
    fn line_items_parse_each_category() {
        let items = load_line_items_from_str(LINE_ITEMS_CSV).expect("should parse");

        assert_eq!(items.len(), 4);
        assert_eq!(
            items[0],
            LineItem::Labor(LaborItem {
                labor_class: "Carpenter".to_string(),
                description: "Frame soffit".to_string(),
                regular_hours: dec!(40),
                overtime_hours: dec!(2.5),
                regular_rate: Cents(5000),
                overtime_rate: Cents(7500),
            })
        );
        assert_eq!(items[1].total(), Cents(58200));
        assert_eq!(items[2].total(), Cents(82500));
        assert_eq!(items[3].total(), Cents(125000));
    }

    #[test]
    fn line_items_minimal_columns() {
        let csv = "category,amount\nsubcontractor,99.99\n";

        let items = load_line_items_from_str(csv).expect("should parse");

        assert_eq!(items[0].total(), Cents(9999));
    }

    #[test]
    fn unknown_category_reports_row() {
        let csv = "category,description\nlabor,ok\noverhead,bad\n";

        let err = load_line_items_from_str(csv).unwrap_err();

        assert!(matches!(
            err,
            CsvLoadError::InvalidCategory { ref value, row: 2 } if value == "overhead"
        ));
    }

    #[test]
    fn unknown_source_type_reports_row() {
        let csv = "category,source_type\nmaterial,borrowed\n";

        let err = load_line_items_from_str(csv).unwrap_err();

        assert_eq!(err.to_string(), "unrecognised source type 'borrowed' on row 1");
    }

    #[test]
    fn malformed_quantity_reports_column_and_row() {
        let csv = "category,quantity\nmaterial,lots\n";

        let err = load_line_items_from_str(csv).unwrap_err();

        assert_eq!(err.to_string(), "invalid quantity 'lots' on row 1");
    }

    #[test]
    fn formatted_money_is_accepted() {
        let csv = "category,amount\nsubcontractor,\"$12,500.00\"\n";

        let items = load_line_items_from_str(csv).expect("should parse");

        assert_eq!(items[0].total(), Cents(1_250_000));
    }

    #[test]
    fn missing_required_column_is_a_parse_error() {
        let csv = "description\nFrame soffit\n";

        assert!(matches!(
            load_line_items_from_str(csv),
            Err(CsvLoadError::Parse(_))
        ));
    }

    #[test]
    fn sov_rows_clamp_current_percent() {
        let csv = "\
id,line_number,description,area,scheduled_value,previous_percent,previous_amount,current_percent
1,1,Site work,Exterior,10000.00,80,8000.00,30
2,2,Framing,,5000.00,,,
";

        let items = load_sov_items_from_str(csv).expect("should parse");

        assert_eq!(items[0].previous_percent, BasisPoints(8000));
        assert_eq!(items[0].current_percent, BasisPoints(2000));
        assert_eq!(items[0].current_amount, Cents(200000));
        assert_eq!(items[0].current_percent_input.as_deref(), Some("30"));
        assert_eq!(items[1].area, None);
        assert_eq!(items[1].current_percent, BasisPoints::ZERO);
    }

    #[test]
    fn invoice_lines_convert_sources() {
        let csv = "\
source,reference,description,amount
cor,COR-003,Added blocking,2358.42
ticket,TM-118,Storm cleanup,612.50
manual,,Permit reimbursement,\"$1,200.50\"
";

        let lines = load_invoice_lines_from_str(csv).expect("should parse");

        assert_eq!(
            lines[0].source,
            InvoiceLineSource::ChangeOrder {
                cor_number: "COR-003".to_string()
            }
        );
        assert_eq!(lines[0].amount, Cents(235842));
        assert_eq!(lines[1].amount, Cents(61250));
        assert_eq!(lines[2].source, InvoiceLineSource::Manual);
        assert_eq!(lines[2].amount, Cents(120050));
    }

    #[test]
    fn invoice_unknown_source_is_rejected() {
        let csv = "source,amount\nbarter,10\n";

        assert!(matches!(
            load_invoice_lines_from_str(csv),
            Err(CsvLoadError::InvalidInvoiceSource { row: 1, .. })
        ));
    }
}
