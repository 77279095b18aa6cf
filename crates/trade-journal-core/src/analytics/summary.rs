use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::equity::{equity_curve, max_drawdown};
use crate::trade::Trade;
use crate::types::*;

/// Average win divided by average loss.
///
/// `Unbounded` means there are winning trades but no losing ones yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitFactor {
    Ratio(Rate),
    Unbounded,
}

impl ProfitFactor {
    /// avg_loss = 0 and avg_win = 0 -> 0, avg_loss = 0 and avg_win > 0 -> unbounded.
    pub fn from_averages(average_win: Money, average_loss: Money) -> Self {
        if average_loss > Decimal::ZERO {
            ProfitFactor::Ratio(average_win / average_loss)
        } else if average_win > Decimal::ZERO {
            ProfitFactor::Unbounded
        } else {
            ProfitFactor::Ratio(Decimal::ZERO)
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Ratio(r) => write!(f, "{}", r.round_dp(2)),
            ProfitFactor::Unbounded => write!(f, "∞"),
        }
    }
}

impl Serialize for ProfitFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProfitFactor::Ratio(r) => Serialize::serialize(r, serializer),
            ProfitFactor::Unbounded => serializer.serialize_str("Infinity"),
        }
    }
}

impl<'de> Deserialize<'de> for ProfitFactor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "Infinity" => Ok(ProfitFactor::Unbounded),
            serde_json::Value::String(s) => s
                .parse::<Decimal>()
                .map(ProfitFactor::Ratio)
                .map_err(de::Error::custom),
            serde_json::Value::Number(n) => n
                .to_string()
                .parse::<Decimal>()
                .map(ProfitFactor::Ratio)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!("invalid profit factor: {other}"))),
        }
    }
}

/// Identifies the best or worst closed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeHighlight {
    pub id: String,
    pub symbol: String,
    pub strategy: String,
    pub pnl: Money,
}

/// Headline statistics over the closed trades of a journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSummary {
    pub total_trades: u32,
    pub closed_trades: u32,
    pub open_trades: u32,
    pub wins: u32,
    pub losses: u32,
    pub break_evens: u32,
    pub total_pnl: Money,
    /// wins / closed * 100
    pub win_rate: Rate,
    pub average_win: Money,
    /// Mean absolute loss, reported positive
    pub average_loss: Money,
    pub profit_factor: ProfitFactor,
    /// total_pnl / closed
    pub expectancy: Money,
    pub best_trade: Option<TradeHighlight>,
    pub worst_trade: Option<TradeHighlight>,
    /// Largest peak-to-trough fall of cumulative P&L
    pub max_drawdown: Money,
}

/// Reduce a trade collection to summary statistics.
///
/// Only closed trades contribute to any sum or ratio. Every ratio with a
/// zero denominator reports zero, so an empty journal is all zeros.
pub fn summarize(trades: &[Trade]) -> JournalSummary {
    let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
    let pnls: Vec<Money> = closed.iter().map(|t| t.pnl().unwrap_or_default()).collect();

    let winners: Vec<Money> = pnls.iter().copied().filter(|&p| p > Decimal::ZERO).collect();
    let losers: Vec<Money> = pnls.iter().copied().filter(|&p| p < Decimal::ZERO).collect();

    let closed_count = closed.len() as u32;
    let wins = winners.len() as u32;
    let losses = losers.len() as u32;
    let total_pnl: Money = pnls.iter().copied().sum();

    let win_rate = ratio(Decimal::from(wins), Decimal::from(closed_count)) * dec!(100);
    let average_win = ratio(winners.iter().copied().sum(), Decimal::from(wins));
    let average_loss = ratio(losers.iter().copied().sum::<Decimal>(), Decimal::from(losses)).abs();
    let expectancy = ratio(total_pnl, Decimal::from(closed_count));

    let curve = equity_curve(trades, None);

    JournalSummary {
        total_trades: trades.len() as u32,
        closed_trades: closed_count,
        open_trades: trades.len() as u32 - closed_count,
        wins,
        losses,
        break_evens: closed_count - wins - losses,
        total_pnl,
        win_rate,
        average_win,
        average_loss,
        profit_factor: ProfitFactor::from_averages(average_win, average_loss),
        expectancy,
        best_trade: extreme(&closed, |candidate, current| candidate > current),
        worst_trade: extreme(&closed, |candidate, current| candidate < current),
        max_drawdown: max_drawdown(&curve, Decimal::ZERO),
    }
}

/// numerator / denominator, or zero for an empty denominator.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// First trade whose pnl beats every earlier one under `better`.
fn extreme(closed: &[&Trade], better: impl Fn(Money, Money) -> bool) -> Option<TradeHighlight> {
    let mut iter = closed.iter();
    let mut pick = *iter.next()?;
    for &t in iter {
        if better(t.pnl().unwrap_or_default(), pick.pnl().unwrap_or_default()) {
            pick = t;
        }
    }
    Some(TradeHighlight {
        id: pick.id.clone(),
        symbol: pick.symbol.clone(),
        strategy: pick.strategy.clone(),
        pnl: pick.pnl().unwrap_or_default(),
    })
}
