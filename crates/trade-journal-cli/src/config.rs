//! CLI configuration.
//!
//! Looked up from `--config`, then the `TJ_CONFIG` environment variable,
//! else built-in defaults. YAML and JSON are both accepted. Command-line
//! flags always win over config values.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "TJ_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON file backing the `journal` commands
    pub journal_path: PathBuf,
    /// Offsets equity curves and drawdown
    pub starting_balance: Option<Decimal>,
    pub account_size: Option<Decimal>,
    pub risk_percent: Decimal,
    /// Account-currency value of one pip per unit of position size
    pub pip_value: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_path: PathBuf::from("trade-journal.json"),
            starting_balance: None,
            account_size: None,
            risk_percent: dec!(1),
            pip_value: dec!(10),
        }
    }
}

impl Config {
    pub fn load(explicit: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = explicit
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(p) => Self::from_file(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let config = Self::parse(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// YAML is a superset of JSON, so one parser covers both.
    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }
}
