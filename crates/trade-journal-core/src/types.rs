use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (P&L, account size, risk amounts).
pub type Money = Decimal;

/// Instrument prices. Zero means "not set" for stop loss and take profit.
pub type Price = Decimal;

/// Ratios and percentages. Percent fields are on a 0-100 scale and say so.
pub type Rate = Decimal;

/// Price distance expressed in pips.
pub type Pips = Decimal;

/// Side of a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// Market category an instrument belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCategory {
    Forex,
    Crypto,
    Stocks,
    Indices,
    Commodities,
    #[default]
    Other,
}

impl MarketCategory {
    pub const ALL: [MarketCategory; 6] = [
        MarketCategory::Forex,
        MarketCategory::Crypto,
        MarketCategory::Stocks,
        MarketCategory::Indices,
        MarketCategory::Commodities,
        MarketCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCategory::Forex => "forex",
            MarketCategory::Crypto => "crypto",
            MarketCategory::Stocks => "stocks",
            MarketCategory::Indices => "indices",
            MarketCategory::Commodities => "commodities",
            MarketCategory::Other => "other",
        }
    }
}

impl fmt::Display for MarketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign classification of a closed trade's P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Win,
    Loss,
    BreakEven,
}

impl Outcome {
    pub fn from_pnl(pnl: Money) -> Self {
        if pnl > Decimal::ZERO {
            Outcome::Win
        } else if pnl < Decimal::ZERO {
            Outcome::Loss
        } else {
            Outcome::BreakEven
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
            Outcome::BreakEven => write!(f, "break-even"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
