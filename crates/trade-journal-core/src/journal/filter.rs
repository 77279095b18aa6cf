use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::trade::Trade;
use crate::types::Outcome;

/// Trade-list filter. Every populated field must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeFilter {
    /// Case-insensitive substring of the symbol, e.g. "usd" or "jpy"
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    /// Exact strategy name
    #[serde(default)]
    pub strategy: Option<String>,
    /// Case-insensitive match against symbol, notes or strategy
    #[serde(default)]
    pub search: Option<String>,
}

impl TradeFilter {
    pub fn matches(&self, trade: &Trade) -> bool {
        if let Some(market) = non_empty(&self.market) {
            if !contains_ci(&trade.symbol, market) {
                return false;
            }
        }
        if let Some(outcome) = self.outcome {
            if trade.outcome() != Some(outcome) {
                return false;
            }
        }
        if let Some(strategy) = non_empty(&self.strategy) {
            if trade.strategy != strategy {
                return false;
            }
        }
        if let Some(term) = non_empty(&self.search) {
            return contains_ci(&trade.symbol, term)
                || contains_ci(&trade.notes, term)
                || contains_ci(&trade.strategy, term);
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Pnl,
    Symbol,
    Pips,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Newest first unless told otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSort {
    #[serde(default)]
    pub field: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

impl TradeSort {
    /// Stable in-place sort. Open trades sort as zero P&L and zero pips.
    pub fn apply(&self, trades: &mut [Trade]) {
        trades.sort_by(|a, b| {
            let ord = self.compare(a, b);
            match self.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    fn compare(&self, a: &Trade, b: &Trade) -> Ordering {
        match self.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Pnl => a.pnl().unwrap_or_default().cmp(&b.pnl().unwrap_or_default()),
            SortField::Symbol => a.symbol.cmp(&b.symbol),
            SortField::Pips => pips(a).cmp(&pips(b)),
        }
    }
}

fn pips(trade: &Trade) -> rust_decimal::Decimal {
    trade.metrics.map(|m| m.pips).unwrap_or_default()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
