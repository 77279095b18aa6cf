use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use trade_journal_core::analytics::{analyze_journal, equity_curve, max_drawdown, JournalAnalyticsInput};
use trade_journal_core::journal::TradeRepository;

use crate::config::Config;
use crate::input;
use crate::repository::JsonFileRepository;

/// Arguments for journal analytics
#[derive(Args)]
pub struct AnalyticsArgs {
    /// JSON file holding a trade array or {"trades": [...], "starting_balance": ...}
    #[arg(long)]
    pub input: Option<String>,

    /// Journal file to analyse when no input is given (falls back to config)
    #[arg(long)]
    pub journal: Option<String>,

    /// Starting account balance for the equity curve
    #[arg(long)]
    pub starting_balance: Option<Decimal>,
}

/// Arguments for the equity curve
#[derive(Args)]
pub struct EquityCurveArgs {
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub journal: Option<String>,

    #[arg(long)]
    pub starting_balance: Option<Decimal>,
}

pub fn run_analytics(args: AnalyticsArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let mut analytics_input = load_trades(args.input.as_deref(), args.journal.as_deref(), config)?;
    if args.starting_balance.is_some() {
        analytics_input.starting_balance = args.starting_balance;
    }
    let result = analyze_journal(&analytics_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_equity_curve(
    args: EquityCurveArgs,
    config: &Config,
) -> Result<Value, Box<dyn std::error::Error>> {
    let loaded = load_trades(args.input.as_deref(), args.journal.as_deref(), config)?;
    let starting_balance = args.starting_balance.or(loaded.starting_balance);
    let points = equity_curve(&loaded.trades, starting_balance);
    let drawdown = max_drawdown(&points, starting_balance.unwrap_or_default());
    Ok(serde_json::json!({
        "points": points,
        "max_drawdown": drawdown,
    }))
}

/// Trades from `--input`, piped stdin, or the journal file, in that order.
fn load_trades(
    path: Option<&str>,
    journal: Option<&str>,
    config: &Config,
) -> Result<JournalAnalyticsInput, Box<dyn std::error::Error>> {
    let raw = match path {
        Some(p) => Some(input::file::read_json_value(p)?),
        None if journal.is_none() => input::stdin::read_stdin()?,
        None => None,
    };

    let mut loaded = match raw {
        Some(Value::Array(items)) => JournalAnalyticsInput {
            trades: serde_json::from_value(Value::Array(items))?,
            starting_balance: None,
        },
        Some(other) => serde_json::from_value(other)?,
        None => {
            let journal_path = journal
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|| config.journal_path.clone());
            let repo = JsonFileRepository::open(&journal_path)?;
            return Ok(JournalAnalyticsInput {
                trades: repo.list()?,
                starting_balance: config.starting_balance,
            });
        }
    };

    if loaded.starting_balance.is_none() {
        loaded.starting_balance = config.starting_balance;
    }
    Ok(loaded)
}
