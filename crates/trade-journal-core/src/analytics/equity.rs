use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trade::Trade;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 1-based position in the curve
    pub sequence: u32,
    pub trade_id: String,
    pub date: DateTime<Utc>,
    pub pnl: Money,
    pub cumulative_pnl: Money,
    /// starting balance + cumulative pnl
    pub balance: Money,
}

/// Cumulative P&L series over the closed trades, ordered by trade date.
///
/// The sort is stable so trades sharing a timestamp keep their input
/// order. Without a starting balance the curve is pure cumulative P&L.
pub fn equity_curve(trades: &[Trade], starting_balance: Option<Money>) -> Vec<EquityPoint> {
    let start = starting_balance.unwrap_or_default();
    let mut closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
    closed.sort_by_key(|t| t.date);

    let mut cumulative = Decimal::ZERO;
    closed
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let pnl = t.pnl().unwrap_or_default();
            cumulative += pnl;
            EquityPoint {
                sequence: i as u32 + 1,
                trade_id: t.id.clone(),
                date: t.date,
                pnl,
                cumulative_pnl: cumulative,
                balance: start + cumulative,
            }
        })
        .collect()
}

/// Largest peak-to-trough fall in balance, reported as a positive amount.
pub fn max_drawdown(points: &[EquityPoint], starting_balance: Money) -> Money {
    let mut peak = starting_balance;
    let mut max_dd = Decimal::ZERO;

    for p in points {
        if p.balance > peak {
            peak = p.balance;
        }
        let dd = peak - p.balance;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}
