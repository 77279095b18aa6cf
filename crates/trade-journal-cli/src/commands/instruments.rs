use clap::Args;
use serde_json::{json, Value};

use trade_journal_core::instruments::catalog::search_symbols;
use trade_journal_core::instruments::{classify, normalize_symbol, pip_size};

use super::MarketArg;

/// Arguments for symbol classification
#[derive(Args)]
pub struct ClassifyArgs {
    /// Instrument symbol, e.g. EURUSD or AAPL
    pub symbol: String,
}

/// Arguments for catalog search
#[derive(Args)]
pub struct SymbolsArgs {
    /// Case-insensitive substring to match
    #[arg(default_value = "")]
    pub query: String,

    /// Restrict to one market category
    #[arg(long)]
    pub market: Option<MarketArg>,
}

pub fn run_classify(args: ClassifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({
        "symbol": normalize_symbol(&args.symbol),
        "market": classify(&args.symbol),
        "pip_size": pip_size(&args.symbol),
    }))
}

pub fn run_symbols(args: SymbolsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let entries = search_symbols(&args.query, args.market.map(Into::into));
    Ok(serde_json::to_value(entries)?)
}
