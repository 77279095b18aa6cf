mod commands;
mod config;
mod input;
mod output;
mod repository;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::analytics::{AnalyticsArgs, EquityCurveArgs};
use commands::instruments::{ClassifyArgs, SymbolsArgs};
use commands::journal::JournalArgs;
use commands::metrics::TradeMetricsArgs;
use commands::psychology::ReadinessArgs;
use commands::risk::{PositionSizeArgs, PriceSizeArgs, RiskRewardArgs};
use config::Config;

/// Trade journal calculations
#[derive(Parser)]
#[command(
    name = "tj",
    version,
    about = "Trade journal metrics, position sizing and analytics",
    long_about = "A CLI for trade journal calculations with decimal precision. \
                  Computes per-trade P&L and pips, position sizes, risk:reward, \
                  emotional readiness, journal analytics and equity curves, and \
                  manages a JSON trade journal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a YAML or JSON config file (falls back to TJ_CONFIG)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a symbol into its market category
    Classify(ClassifyArgs),
    /// Search the built-in symbol catalog
    Symbols(SymbolsArgs),
    /// P&L, pips, outcome and return for a single trade
    TradeMetrics(TradeMetricsArgs),
    /// Position size from account, risk % and stop distance in pips
    PositionSize(PositionSizeArgs),
    /// Position size from entry and stop prices
    PriceSize(PriceSizeArgs),
    /// Reward:risk ratio for a planned trade
    RiskReward(RiskRewardArgs),
    /// Emotional readiness score for a pre-trade assessment
    Readiness(ReadinessArgs),
    /// Journal analytics: win rate, profit factor, breakdowns
    Analytics(AnalyticsArgs),
    /// Cumulative P&L curve over closed trades
    EquityCurve(EquityCurveArgs),
    /// Record, close, edit, list and export journal trades
    Journal(JournalArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_env("TJ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries results only
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Classify(args) => commands::instruments::run_classify(args),
        Commands::Symbols(args) => commands::instruments::run_symbols(args),
        Commands::TradeMetrics(args) => commands::metrics::run_trade_metrics(args),
        Commands::PositionSize(args) => commands::risk::run_position_size(args, &config),
        Commands::PriceSize(args) => commands::risk::run_price_size(args, &config),
        Commands::RiskReward(args) => commands::risk::run_risk_reward(args),
        Commands::Readiness(args) => commands::psychology::run_readiness(args),
        Commands::Analytics(args) => commands::analytics::run_analytics(args, &config),
        Commands::EquityCurve(args) => commands::analytics::run_equity_curve(args, &config),
        Commands::Journal(args) => commands::journal::run_journal(args, &config),
        Commands::Version => {
            println!("tj {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        // Commands that stream their own output return null
        Ok(serde_json::Value::Null) => process::exit(0),
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
