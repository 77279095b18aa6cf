pub mod analytics;
pub mod instruments;
pub mod journal;
pub mod metrics;
pub mod psychology;
pub mod risk;

use clap::ValueEnum;
use serde::de::DeserializeOwned;

use trade_journal_core::journal::{SortField, SortOrder};
use trade_journal_core::{Direction, MarketCategory, Outcome};

use crate::input;

/// Read a typed value from `--input <file>` or piped stdin, if either is present.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(input::file::read_json(path)?));
    }
    match input::stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    Long,
    Short,
}

impl From<SideArg> for Direction {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Long => Direction::Long,
            SideArg::Short => Direction::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MarketArg {
    Forex,
    Crypto,
    Stocks,
    Indices,
    Commodities,
    Other,
}

impl From<MarketArg> for MarketCategory {
    fn from(m: MarketArg) -> Self {
        match m {
            MarketArg::Forex => MarketCategory::Forex,
            MarketArg::Crypto => MarketCategory::Crypto,
            MarketArg::Stocks => MarketCategory::Stocks,
            MarketArg::Indices => MarketCategory::Indices,
            MarketArg::Commodities => MarketCategory::Commodities,
            MarketArg::Other => MarketCategory::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutcomeArg {
    Win,
    Loss,
    BreakEven,
}

impl From<OutcomeArg> for Outcome {
    fn from(o: OutcomeArg) -> Self {
        match o {
            OutcomeArg::Win => Outcome::Win,
            OutcomeArg::Loss => Outcome::Loss,
            OutcomeArg::BreakEven => Outcome::BreakEven,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortFieldArg {
    Date,
    Pnl,
    Symbol,
    Pips,
}

impl From<SortFieldArg> for SortField {
    fn from(f: SortFieldArg) -> Self {
        match f {
            SortFieldArg::Date => SortField::Date,
            SortFieldArg::Pnl => SortField::Pnl,
            SortFieldArg::Symbol => SortField::Symbol,
            SortFieldArg::Pips => SortField::Pips,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(o: SortOrderArg) -> Self {
        match o {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
        }
    }
}
