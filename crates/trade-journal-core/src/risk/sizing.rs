use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::JournalError;
use crate::types::*;
use crate::JournalResult;

const HUNDRED: Decimal = dec!(100);

/// Input for pip-based position sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSizingInput {
    pub account_size: Money,
    /// Percent of the account put at risk, 0-100 (1 = 1%)
    pub risk_percent: Rate,
    /// Distance from entry to stop, in pips
    pub stop_distance_pips: Pips,
    /// Account-currency value of one pip for one unit of size
    pub pip_value: Money,
}

/// Output of pip-based position sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSizing {
    pub risk_amount: Money,
    /// None when the stop distance is zero
    pub risk_per_pip: Option<Money>,
    /// None when risk per pip is undefined or the pip value is zero
    pub position_size: Option<Decimal>,
}

/// Input for the price-based (entry/stop) position calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSizingInput {
    pub account_size: Money,
    pub risk_percent: Rate,
    pub entry_price: Price,
    pub stop_loss: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Price>,
}

/// Output of the price-based position calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSizing {
    pub risk_amount: Money,
    pub risk_per_unit: Money,
    pub position_size: Decimal,
    pub position_value: Money,
    pub reward_per_unit: Money,
    pub potential_reward: Money,
    pub risk_reward: Rate,
}

/// Size a position from account size, risk percent and stop distance.
///
/// risk_amount  = account * risk% / 100
/// risk_per_pip = risk_amount / stop_pips
/// size         = risk_per_pip / pip_value
///
/// A zero stop distance leaves both `risk_per_pip` and `position_size`
/// undefined; callers treat that as "not enough inputs yet".
pub fn position_sizing(
    account_size: Money,
    risk_percent: Rate,
    stop_distance_pips: Pips,
    pip_value: Money,
) -> PositionSizing {
    let risk_amount = account_size * (risk_percent / HUNDRED);
    let risk_per_pip = risk_amount.checked_div(stop_distance_pips);
    let position_size = risk_per_pip.and_then(|rpp| rpp.checked_div(pip_value));

    PositionSizing {
        risk_amount,
        risk_per_pip,
        position_size,
    }
}

/// Size a position from entry and stop prices (units = risk / |entry - stop|).
///
/// `None` when an intermediate value overflows.
pub fn price_based_sizing(input: &PriceSizingInput) -> Option<PriceSizing> {
    let risk_amount = input.account_size.checked_mul(input.risk_percent)? / HUNDRED;
    let risk_per_unit = input.entry_price.checked_sub(input.stop_loss)?.abs();
    let position_size = if risk_per_unit > Decimal::ZERO {
        risk_amount.checked_div(risk_per_unit)?
    } else {
        Decimal::ZERO
    };
    let position_value = position_size.checked_mul(input.entry_price)?;

    let reward_per_unit = match input.take_profit {
        Some(tp) if !tp.is_zero() => tp.checked_sub(input.entry_price)?.abs(),
        _ => Decimal::ZERO,
    };
    let potential_reward = reward_per_unit.checked_mul(position_size)?;
    let risk_reward = if risk_per_unit > Decimal::ZERO {
        reward_per_unit.checked_div(risk_per_unit)?
    } else {
        Decimal::ZERO
    };

    Some(PriceSizing {
        risk_amount,
        risk_per_unit,
        position_size,
        position_value,
        reward_per_unit,
        potential_reward,
        risk_reward,
    })
}

/// Validated pip-based sizing, wrapped with metadata.
pub fn analyze_position_size(
    input: &PositionSizingInput,
) -> JournalResult<ComputationOutput<PositionSizing>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_account(input.account_size, input.risk_percent)?;
    if input.stop_distance_pips < Decimal::ZERO {
        return Err(JournalError::invalid(
            "stop_distance_pips",
            "Stop distance cannot be negative",
        ));
    }
    if input.pip_value < Decimal::ZERO {
        return Err(JournalError::invalid("pip_value", "Pip value cannot be negative"));
    }

    let output = position_sizing(
        input.account_size,
        input.risk_percent,
        input.stop_distance_pips,
        input.pip_value,
    );

    if input.stop_distance_pips.is_zero() {
        warnings.push("Stop distance is zero: position size is undefined".into());
    } else if input.pip_value.is_zero() {
        warnings.push("Pip value is zero: position size is undefined".into());
    }
    if !warnings.is_empty() {
        tracing::warn!(?warnings, "position sizing under-specified");
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Fractional Position Sizing (pip distance)",
        &serde_json::json!({
            "account_size": input.account_size.to_string(),
            "risk_percent": input.risk_percent.to_string(),
            "stop_distance_pips": input.stop_distance_pips.to_string(),
            "pip_value": input.pip_value.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Validated price-based sizing, wrapped with metadata.
pub fn analyze_price_sizing(input: &PriceSizingInput) -> JournalResult<ComputationOutput<PriceSizing>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_account(input.account_size, input.risk_percent)?;
    if input.entry_price <= Decimal::ZERO {
        return Err(JournalError::invalid("entry_price", "Entry price must be positive"));
    }
    if input.stop_loss < Decimal::ZERO {
        return Err(JournalError::invalid("stop_loss", "Stop loss cannot be negative"));
    }

    let output = price_based_sizing(input).ok_or_else(|| {
        JournalError::invalid("stop_loss", "Values are too large to size a position")
    })?;
    if output.risk_per_unit.is_zero() {
        warnings.push("Stop equals entry: position size reported as zero".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Fractional Position Sizing (price distance)",
        &serde_json::json!({
            "account_size": input.account_size.to_string(),
            "risk_percent": input.risk_percent.to_string(),
            "sizing": "risk_amount / |entry - stop|",
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_account(account_size: Money, risk_percent: Rate) -> JournalResult<()> {
    if account_size <= Decimal::ZERO {
        return Err(JournalError::invalid("account_size", "Account size must be positive"));
    }
    if risk_percent <= Decimal::ZERO || risk_percent > HUNDRED {
        return Err(JournalError::invalid(
            "risk_percent",
            "Risk percent must be in (0, 100]",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_sizing_basic() {
        // 10,000 account, 1% risk = 100; 20 pip stop = 5/pip; $10 pip value = 0.5 lots
        let out = position_sizing(dec!(10000), dec!(1), dec!(20), dec!(10));
        assert_eq!(out.risk_amount, dec!(100));
        assert_eq!(out.risk_per_pip, Some(dec!(5)));
        assert_eq!(out.position_size, Some(dec!(0.5)));
    }

    #[test]
    fn test_zero_stop_is_undefined_not_panic() {
        let out = position_sizing(dec!(10000), dec!(2), Decimal::ZERO, dec!(10));
        assert_eq!(out.risk_amount, dec!(200));
        assert!(out.risk_per_pip.is_none());
        assert!(out.position_size.is_none());
    }

    #[test]
    fn test_zero_pip_value_leaves_size_undefined() {
        let out = position_sizing(dec!(5000), dec!(1), dec!(25), Decimal::ZERO);
        assert_eq!(out.risk_per_pip, Some(dec!(2)));
        assert!(out.position_size.is_none());
    }

    #[test]
    fn test_analyze_warns_on_zero_stop() {
        let input = PositionSizingInput {
            account_size: dec!(1000),
            risk_percent: dec!(1),
            stop_distance_pips: Decimal::ZERO,
            pip_value: dec!(1),
        };
        let result = analyze_position_size(&input).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.result.position_size.is_none());
    }

    #[test]
    fn test_analyze_rejects_bad_risk_percent() {
        let input = PositionSizingInput {
            account_size: dec!(1000),
            risk_percent: dec!(150),
            stop_distance_pips: dec!(10),
            pip_value: dec!(1),
        };
        match analyze_position_size(&input).unwrap_err() {
            JournalError::InvalidInput { field, .. } => assert_eq!(field, "risk_percent"),
            other => panic!("Expected InvalidInput for risk_percent, got {other:?}"),
        }
    }

    #[test]
    fn test_price_based_sizing() {
        // risk 1% of 10,000 = 100; |50 - 48| = 2 -> 50 units worth 2,500
        // target 56 -> reward 6/unit, 300 potential, 3R
        let out = price_based_sizing(&PriceSizingInput {
            account_size: dec!(10000),
            risk_percent: dec!(1),
            entry_price: dec!(50),
            stop_loss: dec!(48),
            take_profit: Some(dec!(56)),
        })
        .unwrap();
        assert_eq!(out.risk_amount, dec!(100));
        assert_eq!(out.risk_per_unit, dec!(2));
        assert_eq!(out.position_size, dec!(50));
        assert_eq!(out.position_value, dec!(2500));
        assert_eq!(out.potential_reward, dec!(300));
        assert_eq!(out.risk_reward, dec!(3));
    }

    #[test]
    fn test_price_based_sizing_stop_at_entry() {
        let out = price_based_sizing(&PriceSizingInput {
            account_size: dec!(10000),
            risk_percent: dec!(1),
            entry_price: dec!(50),
            stop_loss: dec!(50),
            take_profit: None,
        })
        .unwrap();
        assert_eq!(out.position_size, Decimal::ZERO);
        assert_eq!(out.risk_reward, Decimal::ZERO);
        assert_eq!(out.potential_reward, Decimal::ZERO);
    }

    #[test]
    fn test_price_sizing_overflow_is_an_error() {
        let input = PriceSizingInput {
            account_size: dec!(1000000),
            risk_percent: dec!(1),
            entry_price: dec!(1),
            stop_loss: dec!(0.9999999999999999999999999999),
            take_profit: None,
        };
        assert!(price_based_sizing(&input).is_none());
        match analyze_price_sizing(&input).unwrap_err() {
            JournalError::InvalidInput { field, .. } => assert_eq!(field, "stop_loss"),
            other => panic!("Expected InvalidInput for stop_loss, got {other:?}"),
        }
    }
}
