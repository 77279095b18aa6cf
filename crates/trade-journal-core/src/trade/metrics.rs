use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::JournalError;
use crate::instruments::{classify, normalize_symbol, pip_size};
use crate::types::*;
use crate::JournalResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeMetricsInput {
    pub direction: Direction,
    pub entry_price: Price,
    pub exit_price: Price,
    #[serde(default = "default_position_size")]
    pub position_size: Decimal,
    pub symbol: String,
}

pub(crate) fn default_position_size() -> Decimal {
    Decimal::ONE
}

/// Derived fields of a closed trade. Never entered by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub pnl: Money,
    /// Absolute price distance in pips, direction-agnostic
    pub pips: Pips,
    pub outcome: Outcome,
    /// P&L as a percent of entry notional (entry * size), 0-100 scale
    pub return_percent: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAnalysis {
    pub symbol: String,
    pub market: MarketCategory,
    pub pip_size: Price,
    #[serde(flatten)]
    pub metrics: TradeMetrics,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute P&L, pips, outcome and return percent for one trade.
///
/// Long profits when price rises: (exit - entry) * size.
/// Short profits when price falls: (entry - exit) * size.
/// No validation is performed; a zero entry (or zero notional) yields a
/// zero return percent.
pub fn compute_trade_metrics(
    direction: Direction,
    entry_price: Price,
    exit_price: Price,
    position_size: Decimal,
    symbol: &str,
) -> TradeMetrics {
    let pnl = match direction {
        Direction::Long => (exit_price - entry_price) * position_size,
        Direction::Short => (entry_price - exit_price) * position_size,
    };
    let pips = (exit_price - entry_price).abs() / pip_size(symbol);

    let notional = entry_price * position_size;
    let return_percent = if entry_price.is_zero() || notional.is_zero() {
        Decimal::ZERO
    } else {
        pnl / notional * dec!(100)
    };

    TradeMetrics {
        pnl,
        pips,
        outcome: Outcome::from_pnl(pnl),
        return_percent,
    }
}

/// [`compute_trade_metrics`] with overflow-checked arithmetic.
///
/// Returns `None` when any intermediate value leaves the `Decimal` range.
pub fn checked_trade_metrics(
    direction: Direction,
    entry_price: Price,
    exit_price: Price,
    position_size: Decimal,
    symbol: &str,
) -> Option<TradeMetrics> {
    let delta = match direction {
        Direction::Long => exit_price.checked_sub(entry_price)?,
        Direction::Short => entry_price.checked_sub(exit_price)?,
    };
    let pnl = delta.checked_mul(position_size)?;
    let pips = delta.abs().checked_div(pip_size(symbol))?;

    let notional = entry_price.checked_mul(position_size)?;
    let return_percent = if entry_price.is_zero() || notional.is_zero() {
        Decimal::ZERO
    } else {
        pnl.checked_div(notional)?.checked_mul(dec!(100))?
    };

    Some(TradeMetrics {
        pnl,
        pips,
        outcome: Outcome::from_pnl(pnl),
        return_percent,
    })
}

/// Validate form input and compute the trade's derived fields.
pub fn analyze_trade(input: &TradeMetricsInput) -> JournalResult<ComputationOutput<TradeAnalysis>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let symbol = normalize_symbol(&input.symbol);
    let metrics = checked_trade_metrics(
        input.direction,
        input.entry_price,
        input.exit_price,
        input.position_size,
        &symbol,
    )
    .ok_or_else(|| out_of_range("position_size"))?;
    let output = TradeAnalysis {
        market: classify(&symbol),
        pip_size: pip_size(&symbol),
        symbol,
        metrics,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Trade P&L Metrics",
        &serde_json::json!({
            "direction": input.direction.to_string(),
            "pnl": "long: (exit - entry) * size, short: (entry - exit) * size",
            "pips": "|exit - entry| / pip_size",
            "return_percent": "pnl / (entry * size) * 100",
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &TradeMetricsInput) -> JournalResult<()> {
    if input.symbol.trim().is_empty() {
        return Err(JournalError::invalid("symbol", "Symbol is required"));
    }
    if input.entry_price <= Decimal::ZERO {
        return Err(JournalError::invalid("entry_price", "Entry price must be greater than 0"));
    }
    if input.exit_price <= Decimal::ZERO {
        return Err(JournalError::invalid("exit_price", "Exit price must be greater than 0"));
    }
    if input.position_size <= Decimal::ZERO {
        return Err(JournalError::invalid(
            "position_size",
            "Position size must be greater than 0",
        ));
    }
    Ok(())
}

pub(crate) fn out_of_range(field: &str) -> JournalError {
    JournalError::invalid(field, "Values are too large to compute")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_winning_long() {
        let m = compute_trade_metrics(Direction::Long, dec!(100), dec!(110), dec!(2), "AAPL");
        assert_eq!(m.pnl, dec!(20));
        assert_eq!(m.outcome, Outcome::Win);
        assert_eq!(m.return_percent, dec!(10));
    }

    #[test]
    fn test_losing_short() {
        let m = compute_trade_metrics(Direction::Short, dec!(100), dec!(110), dec!(1), "AAPL");
        assert_eq!(m.pnl, dec!(-10));
        assert_eq!(m.outcome, Outcome::Loss);
        assert_eq!(m.return_percent, dec!(-10));
    }

    #[test]
    fn test_winning_short() {
        let m = compute_trade_metrics(Direction::Short, dec!(1.2000), dec!(1.1950), dec!(10000), "GBPUSD");
        assert_eq!(m.pnl, dec!(50));
        assert_eq!(m.pips, dec!(50));
        assert_eq!(m.outcome, Outcome::Win);
    }

    #[test]
    fn test_break_even() {
        let m = compute_trade_metrics(Direction::Long, dec!(50), dec!(50), dec!(3), "ES");
        assert_eq!(m.pnl, Decimal::ZERO);
        assert_eq!(m.pips, Decimal::ZERO);
        assert_eq!(m.outcome, Outcome::BreakEven);
        assert_eq!(m.return_percent, Decimal::ZERO);
    }

    #[test]
    fn test_jpy_pips() {
        let m = compute_trade_metrics(Direction::Long, dec!(150.00), dec!(150.75), dec!(1), "USDJPY");
        assert_eq!(m.pips, dec!(75));
    }

    #[test]
    fn test_pips_symmetric_and_non_negative() {
        let a = compute_trade_metrics(Direction::Long, dec!(1.1000), dec!(1.1025), dec!(1), "EURUSD");
        let b = compute_trade_metrics(Direction::Short, dec!(1.1025), dec!(1.1000), dec!(1), "EURUSD");
        assert_eq!(a.pips, dec!(25));
        assert_eq!(a.pips, b.pips);
    }

    #[test]
    fn test_zero_entry_return_is_zero() {
        for direction in [Direction::Long, Direction::Short] {
            let m = compute_trade_metrics(direction, Decimal::ZERO, dec!(5), dec!(2), "BTC");
            assert_eq!(m.return_percent, Decimal::ZERO);
        }
        let m = compute_trade_metrics(Direction::Long, dec!(10), dec!(12), Decimal::ZERO, "BTC");
        assert_eq!(m.return_percent, Decimal::ZERO);
    }

    #[test]
    fn test_analyze_trade_classifies() {
        let input = TradeMetricsInput {
            direction: Direction::Long,
            entry_price: dec!(1.0850),
            exit_price: dec!(1.0900),
            position_size: dec!(100000),
            symbol: " eurusd ".into(),
        };
        let result = analyze_trade(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.symbol, "EURUSD");
        assert_eq!(out.market, MarketCategory::Forex);
        assert_eq!(out.pip_size, dec!(0.0001));
        assert_eq!(out.metrics.pips, dec!(50));
        assert_eq!(out.metrics.pnl, dec!(500));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_analyze_trade_rejects_non_positive() {
        let input = TradeMetricsInput {
            direction: Direction::Short,
            entry_price: dec!(10),
            exit_price: Decimal::ZERO,
            position_size: Decimal::ONE,
            symbol: "AAPL".into(),
        };
        match analyze_trade(&input).unwrap_err() {
            JournalError::InvalidInput { field, .. } => assert_eq!(field, "exit_price"),
            other => panic!("Expected InvalidInput for exit_price, got {other:?}"),
        }
    }

    #[test]
    fn test_checked_metrics_match_plain_metrics() {
        let plain = compute_trade_metrics(Direction::Short, dec!(1.2000), dec!(1.1950), dec!(10000), "GBPUSD");
        let checked = checked_trade_metrics(Direction::Short, dec!(1.2000), dec!(1.1950), dec!(10000), "GBPUSD");
        assert_eq!(checked, Some(plain));
    }

    #[test]
    fn test_huge_prices_are_rejected_not_panicking() {
        assert!(checked_trade_metrics(Direction::Long, dec!(10000000000000000000000000), dec!(1), dec!(1), "EURUSD").is_none());

        let input = TradeMetricsInput {
            direction: Direction::Long,
            entry_price: dec!(10000000000000000000000000),
            exit_price: dec!(1),
            position_size: Decimal::ONE,
            symbol: "EURUSD".into(),
        };
        match analyze_trade(&input).unwrap_err() {
            JournalError::InvalidInput { reason, .. } => assert!(reason.contains("too large")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
