pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod report;

pub use config::{ConfigError, ReportConfig};
pub use csv_loader::{
    CsvLoadError, load_invoice_lines_from_file, load_invoice_lines_from_str,
    load_line_items_from_file, load_line_items_from_str, load_sov_items_from_file,
    load_sov_items_from_str,
};
