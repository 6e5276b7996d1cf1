use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use cor_core::calculations::money::{dollars_to_cents, percent_to_basis_points};
use cor_core::calculations::{
    calculate_cor_totals, calculate_draw_totals, calculate_invoice_totals,
};
use cor_core::{BasisPoints, ChangeOrderRequest, DrawRequest, DrawStatus, Invoice};
use cor_data::logging::init_logging;
use cor_data::report::{render_cor_report, render_draw_report, render_invoice_report};
use cor_data::{
    ReportConfig, load_invoice_lines_from_file, load_line_items_from_file,
    load_sov_items_from_file,
};
use tracing::{debug, info};

/// Print change order, draw request and invoice totals from CSV files.
///
/// Money columns are dollars and rate flags are percents (`15`, `1.44`).
#[derive(Parser, Debug)]
#[command(name = "cor-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file with log_level, log_file and retention_percent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level or EnvFilter directive; overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Markup and fee cascade of one change order
    Cor(CorArgs),
    /// Schedule-of-values billing for one draw request
    Draw(DrawArgs),
    /// Invoice subtotal, retention and total due
    Invoice(InvoiceArgs),
}

#[derive(Args, Debug)]
struct CorArgs {
    /// Line-item CSV (category, description, hours, quantity, unit_cost, ...)
    #[arg(short, long)]
    file: PathBuf,

    #[arg(long, default_value = "COR-001")]
    number: String,

    #[arg(long, default_value = "")]
    title: String,

    #[arg(long, default_value = "")]
    scope: String,

    /// Labor markup percent (default 15)
    #[arg(long)]
    labor_markup: Option<String>,

    /// Materials markup percent (default 15)
    #[arg(long)]
    materials_markup: Option<String>,

    /// Equipment markup percent (default 15)
    #[arg(long)]
    equipment_markup: Option<String>,

    /// Subcontractors markup percent (default 5)
    #[arg(long)]
    subcontractors_markup: Option<String>,

    /// Liability insurance percent (default 1.44)
    #[arg(long)]
    liability_insurance: Option<String>,

    /// Bond percent (default 1.00)
    #[arg(long)]
    bond: Option<String>,

    /// License fee percent (default 0.10)
    #[arg(long)]
    license_fee: Option<String>,
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Schedule-of-values CSV with previous and current percents
    #[arg(short, long)]
    file: PathBuf,

    #[arg(long, default_value_t = 1)]
    draw_number: u32,

    /// First day of the billing period (YYYY-MM-DD); defaults to today
    #[arg(long)]
    period_start: Option<NaiveDate>,

    /// Last day of the billing period (YYYY-MM-DD); defaults to today
    #[arg(long)]
    period_end: Option<NaiveDate>,

    /// Retention percent; overrides the config file
    #[arg(long)]
    retention: Option<String>,

    /// Retention held through the prior draw, in dollars
    #[arg(long, default_value = "0")]
    previous_retention: String,
}

#[derive(Args, Debug)]
struct InvoiceArgs {
    /// Invoice-line CSV (source, reference, description, amount)
    #[arg(short, long)]
    file: PathBuf,

    #[arg(long, default_value = "INV-001")]
    number: String,

    /// Retention percent; overrides the config file
    #[arg(long)]
    retention: Option<String>,
}

fn rate(flag: &Option<String>) -> Option<BasisPoints> {
    flag.as_deref().map(percent_to_basis_points)
}

/// Retention flag, then config, then 0%.
fn resolve_retention(
    flag: &Option<String>,
    config: &ReportConfig,
) -> BasisPoints {
    rate(flag)
        .or_else(|| config.retention())
        .unwrap_or(BasisPoints::ZERO)
}

fn run_cor(args: &CorArgs) -> Result<String> {
    let items = load_line_items_from_file(&args.file)
        .with_context(|| format!("Failed to load line items: {}", args.file.display()))?;
    debug!(count = items.len(), "loaded line items");

    let mut cor = ChangeOrderRequest {
        cor_number: args.number.clone(),
        title: args.title.clone(),
        scope_of_work: args.scope.clone(),
        labor_markup_percent: rate(&args.labor_markup),
        materials_markup_percent: rate(&args.materials_markup),
        equipment_markup_percent: rate(&args.equipment_markup),
        subcontractors_markup_percent: rate(&args.subcontractors_markup),
        liability_insurance_percent: rate(&args.liability_insurance),
        bond_percent: rate(&args.bond),
        license_fee_percent: rate(&args.license_fee),
        ..Default::default()
    };
    for item in items {
        cor.push_line_item(item);
    }

    let totals = calculate_cor_totals(&cor);
    Ok(render_cor_report(&cor, &totals))
}

fn run_draw(
    args: &DrawArgs,
    config: &ReportConfig,
) -> Result<String> {
    let items = load_sov_items_from_file(&args.file)
        .with_context(|| format!("Failed to load schedule of values: {}", args.file.display()))?;
    debug!(count = items.len(), "loaded schedule of values");

    let today = Local::now().date_naive();
    let draw = DrawRequest {
        id: 0,
        project_id: 0,
        draw_number: args.draw_number,
        period_start: args.period_start.unwrap_or(today),
        period_end: args.period_end.unwrap_or(today),
        retention_percent: resolve_retention(&args.retention, config),
        previous_retention: dollars_to_cents(&args.previous_retention),
        status: DrawStatus::Draft,
        items,
    };

    let totals = calculate_draw_totals(&draw);
    Ok(render_draw_report(&draw, &totals))
}

fn run_invoice(
    args: &InvoiceArgs,
    config: &ReportConfig,
) -> Result<String> {
    let line_items = load_invoice_lines_from_file(&args.file)
        .with_context(|| format!("Failed to load invoice lines: {}", args.file.display()))?;
    debug!(count = line_items.len(), "loaded invoice lines");

    let invoice = Invoice {
        invoice_number: args.number.clone(),
        retention_percent: resolve_retention(&args.retention, config),
        line_items,
        ..Default::default()
    };

    let totals = calculate_invoice_totals(&invoice);
    Ok(render_invoice_report(&invoice, &totals))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ReportConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load report configuration")?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, config.log_file.as_deref())?;

    if let Some(path) = &cli.config {
        info!(config = %path.display(), "loaded configuration");
    }

    let output = match &cli.command {
        Command::Cor(args) => run_cor(args)?,
        Command::Draw(args) => run_draw(args, &config)?,
        Command::Invoice(args) => run_invoice(args, &config)?,
    };
    print!("{output}");

    Ok(())
}
