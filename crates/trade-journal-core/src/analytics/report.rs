use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::breakdown::{
    by_day, by_emotion, by_strategy, by_weekday, readiness_points, DayStats, GroupStats,
    ReadinessPoint,
};
use super::equity::{equity_curve, max_drawdown, EquityPoint};
use super::insights::{psych_insights, PsychInsights};
use super::summary::{summarize, JournalSummary, ProfitFactor};
use crate::error::JournalError;
use crate::trade::Trade;
use crate::types::*;
use crate::JournalResult;

/// Days shown in the daily P&L series.
const RECENT_DAYS: usize = 14;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalAnalyticsInput {
    pub trades: Vec<Trade>,
    /// Offsets the equity curve; zero when absent
    #[serde(default)]
    pub starting_balance: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalAnalyticsOutput {
    pub summary: JournalSummary,
    /// The most recent days with closed trades, oldest first
    pub by_day: Vec<DayStats>,
    pub by_weekday: Vec<GroupStats>,
    pub by_emotion: Vec<GroupStats>,
    pub by_strategy: Vec<GroupStats>,
    pub equity_curve: Vec<EquityPoint>,
    /// Drawdown of the balance curve measured from the starting balance
    pub balance_drawdown: Money,
    pub readiness_points: Vec<ReadinessPoint>,
    pub psych_insights: PsychInsights,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Full dashboard analytics over a trade collection.
pub fn analyze_journal(
    input: &JournalAnalyticsInput,
) -> JournalResult<ComputationOutput<JournalAnalyticsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(balance) = input.starting_balance {
        if balance < Decimal::ZERO {
            return Err(JournalError::invalid(
                "starting_balance",
                "Starting balance cannot be negative",
            ));
        }
    }

    let trades = &input.trades;
    let summary = summarize(trades);
    if summary.closed_trades == 0 {
        warnings.push("No closed trades: all statistics are zero".into());
    }
    if summary.profit_factor == ProfitFactor::Unbounded {
        warnings.push("No losing trades yet: profit factor is unbounded".into());
    }
    let missing_pnl = trades
        .iter()
        .filter(|t| t.is_closed() && t.metrics.is_none())
        .count();
    if missing_pnl > 0 {
        warnings.push(format!("{missing_pnl} closed trade(s) have no P&L and count as zero"));
    }

    let starting_balance = input.starting_balance.unwrap_or_default();
    let curve = equity_curve(trades, input.starting_balance);
    let balance_drawdown = max_drawdown(&curve, starting_balance);

    tracing::debug!(
        trades = trades.len(),
        closed = summary.closed_trades,
        "journal analytics computed"
    );

    let output = JournalAnalyticsOutput {
        summary,
        by_day: by_day(trades, Some(RECENT_DAYS)),
        by_weekday: by_weekday(trades),
        by_emotion: by_emotion(trades),
        by_strategy: by_strategy(trades),
        equity_curve: curve,
        balance_drawdown,
        readiness_points: readiness_points(trades),
        psych_insights: psych_insights(trades),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-trade journal statistics with cumulative P&L curve",
        &serde_json::json!({
            "trades": trades.len(),
            "starting_balance": starting_balance.to_string(),
            "scope": "closed trades only",
        }),
        warnings,
        elapsed,
        output,
    ))
}
