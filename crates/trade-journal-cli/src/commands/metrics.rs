use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use trade_journal_core::trade::metrics::{analyze_trade, TradeMetricsInput};

use super::{read_input, SideArg};

/// Arguments for single-trade metrics
#[derive(Args)]
pub struct TradeMetricsArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Instrument symbol
    #[arg(long)]
    pub symbol: Option<String>,

    /// Trade direction
    #[arg(long, default_value = "long")]
    pub direction: SideArg,

    /// Entry price
    #[arg(long)]
    pub entry: Option<Decimal>,

    /// Exit price
    #[arg(long)]
    pub exit: Option<Decimal>,

    /// Position size in units
    #[arg(long, default_value = "1")]
    pub size: Decimal,
}

pub fn run_trade_metrics(args: TradeMetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let metrics_input = match (args.symbol, args.entry, args.exit) {
        (Some(symbol), Some(entry_price), Some(exit_price)) => TradeMetricsInput {
            direction: args.direction.into(),
            entry_price,
            exit_price,
            position_size: args.size,
            symbol,
        },
        _ => read_input::<TradeMetricsInput>(args.input.as_deref())?
            .ok_or("--symbol, --entry and --exit, or --input <file.json> / stdin required")?,
    };
    let result = analyze_trade(&metrics_input)?;
    Ok(serde_json::to_value(result)?)
}
