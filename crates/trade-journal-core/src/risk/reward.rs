use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::JournalError;
use crate::types::*;
use crate::JournalResult;

/// Input for a planned risk:reward check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRewardInput {
    pub direction: Direction,
    pub entry_price: Price,
    pub stop_loss: Price,
    pub take_profit: Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRewardOutput {
    /// Signed distance from entry to stop in the losing direction
    pub risk: Price,
    /// Signed distance from entry to target in the winning direction
    pub reward: Price,
    /// reward / risk, or zero when risk is not positive
    pub ratio: Rate,
}

fn distances(entry: Price, stop_loss: Price, take_profit: Price, direction: Direction) -> (Price, Price) {
    match direction {
        Direction::Long => (entry - stop_loss, take_profit - entry),
        Direction::Short => (stop_loss - entry, entry - take_profit),
    }
}

/// Planned reward-to-risk ratio for a position.
///
/// A non-positive risk distance (stop on the wrong side of entry, or at
/// entry) reports zero rather than a negative or unbounded ratio.
pub fn risk_reward(entry: Price, stop_loss: Price, take_profit: Price, direction: Direction) -> Rate {
    let (risk, reward) = distances(entry, stop_loss, take_profit, direction);
    checked_ratio(reward, risk).unwrap_or(Decimal::ZERO)
}

/// reward / risk for a positive risk; `None` only when the division overflows.
fn checked_ratio(reward: Price, risk: Price) -> Option<Rate> {
    if risk > Decimal::ZERO {
        reward.checked_div(risk)
    } else {
        Some(Decimal::ZERO)
    }
}

/// Realised P&L as a multiple of the amount originally risked.
///
/// Risked amount = |entry - stop| * size. None when no stop was set
/// (zero) or the risked amount is zero.
pub fn r_multiple(entry: Price, stop_loss: Price, pnl: Money, position_size: Decimal) -> Option<Rate> {
    if stop_loss.is_zero() {
        return None;
    }
    let risked = (entry - stop_loss).abs().checked_mul(position_size)?;
    pnl.checked_div(risked)
}

/// Validated risk:reward check, wrapped with metadata.
pub fn analyze_risk_reward(input: &RiskRewardInput) -> JournalResult<ComputationOutput<RiskRewardOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for (field, value) in [
        ("entry_price", input.entry_price),
        ("stop_loss", input.stop_loss),
        ("take_profit", input.take_profit),
    ] {
        if value <= Decimal::ZERO {
            return Err(JournalError::invalid(field, "Price must be positive"));
        }
    }

    let (risk, reward) = distances(
        input.entry_price,
        input.stop_loss,
        input.take_profit,
        input.direction,
    );
    let ratio = checked_ratio(reward, risk).ok_or_else(|| {
        JournalError::invalid("stop_loss", "Stop is too close to entry to compute a ratio")
    })?;

    if risk <= Decimal::ZERO {
        warnings.push(format!(
            "Stop {} is not below/above entry {} for a {} position: ratio reported as zero",
            input.stop_loss, input.entry_price, input.direction
        ));
    }
    if reward <= Decimal::ZERO {
        warnings.push("Target does not lie in the profitable direction".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Planned Risk:Reward",
        &serde_json::json!({
            "direction": input.direction.to_string(),
            "long": "risk = entry - stop, reward = target - entry",
            "short": "risk = stop - entry, reward = entry - target",
        }),
        warnings,
        elapsed,
        RiskRewardOutput { risk, reward, ratio },
    ))
}
