//! Report settings read from a TOML file.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "cor-report.log"
//! retention_percent = 10
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use cor_core::BasisPoints;
use cor_core::calculations::money::percent_to_basis_points;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Bare level or EnvFilter directive; `RUST_LOG` still wins.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Retention applied to invoices and first draws when no flag is given,
    /// in percent (`10` or `7.5`).
    pub retention_percent: Option<Decimal>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
            retention_percent: None,
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Configured retention in basis points.
    pub fn retention(&self) -> Option<BasisPoints> {
        self.retention_percent
            .map(|percent| percent_to_basis_points(&percent.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ReportConfig::from_toml_str("").unwrap();

        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.retention(), None);
    }

    #[test]
    fn all_keys() {
        let config = ReportConfig::from_toml_str(
            r#"
            log_level = "cor_core=debug"
            log_file = "logs/report.log"
            retention_percent = 7.5
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "cor_core=debug");
        assert_eq!(config.log_file, Some(PathBuf::from("logs/report.log")));
        assert_eq!(config.retention_percent, Some(dec!(7.5)));
        assert_eq!(config.retention(), Some(BasisPoints(750)));
    }

    #[test]
    fn integer_retention() {
        let config = ReportConfig::from_toml_str("retention_percent = 10").unwrap();

        assert_eq!(config.retention(), Some(BasisPoints(1000)));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = ReportConfig::from_toml_str("retention = 10");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ReportConfig::load(Path::new("does/not/exist.toml")).unwrap_err();

        assert!(err.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(
            ReportConfig::load_or_default(None).unwrap(),
            ReportConfig::default()
        );
    }
}
