use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use trade_journal_core::risk::reward::{analyze_risk_reward, RiskRewardInput};
use trade_journal_core::risk::sizing::{
    analyze_position_size, analyze_price_sizing, PositionSizingInput, PriceSizingInput,
};

use super::SideArg;
use crate::config::Config;

/// Arguments for pip-based position sizing
#[derive(Args)]
pub struct PositionSizeArgs {
    /// Account size in account currency (falls back to config)
    #[arg(long)]
    pub account: Option<Decimal>,

    /// Percent of the account to risk, e.g. 1 for 1%
    #[arg(long)]
    pub risk_percent: Option<Decimal>,

    /// Stop-loss distance in pips
    #[arg(long)]
    pub stop_pips: Decimal,

    /// Value of one pip per unit of size
    #[arg(long)]
    pub pip_value: Option<Decimal>,
}

/// Arguments for price-based position sizing
#[derive(Args)]
pub struct PriceSizeArgs {
    /// Account size in account currency (falls back to config)
    #[arg(long)]
    pub account: Option<Decimal>,

    /// Percent of the account to risk
    #[arg(long)]
    pub risk_percent: Option<Decimal>,

    /// Entry price
    #[arg(long)]
    pub entry: Decimal,

    /// Stop-loss price
    #[arg(long)]
    pub stop: Decimal,

    /// Optional take-profit price
    #[arg(long)]
    pub target: Option<Decimal>,
}

/// Arguments for reward:risk
#[derive(Args)]
pub struct RiskRewardArgs {
    #[arg(long, default_value = "long")]
    pub direction: SideArg,

    #[arg(long)]
    pub entry: Decimal,

    #[arg(long)]
    pub stop: Decimal,

    #[arg(long)]
    pub target: Decimal,
}

fn account_size(flag: Option<Decimal>, config: &Config) -> Result<Decimal, Box<dyn std::error::Error>> {
    flag.or(config.account_size)
        .ok_or_else(|| "--account required (or set account_size in config)".into())
}

pub fn run_position_size(
    args: PositionSizeArgs,
    config: &Config,
) -> Result<Value, Box<dyn std::error::Error>> {
    let sizing_input = PositionSizingInput {
        account_size: account_size(args.account, config)?,
        risk_percent: args.risk_percent.unwrap_or(config.risk_percent),
        stop_distance_pips: args.stop_pips,
        pip_value: args.pip_value.unwrap_or(config.pip_value),
    };
    let result = analyze_position_size(&sizing_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_price_size(args: PriceSizeArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let sizing_input = PriceSizingInput {
        account_size: account_size(args.account, config)?,
        risk_percent: args.risk_percent.unwrap_or(config.risk_percent),
        entry_price: args.entry,
        stop_loss: args.stop,
        take_profit: args.target,
    };
    let result = analyze_price_sizing(&sizing_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_risk_reward(args: RiskRewardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rr_input = RiskRewardInput {
        direction: args.direction.into(),
        entry_price: args.entry,
        stop_loss: args.stop,
        take_profit: args.target,
    };
    let result = analyze_risk_reward(&rr_input)?;
    Ok(serde_json::to_value(result)?)
}
