use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metrics::{checked_trade_metrics, default_position_size, out_of_range, TradeMetrics};
use crate::error::JournalError;
use crate::instruments::{classify, normalize_symbol};
use crate::psychology::{score_readiness, PostTradeReflection, PsychAssessment, ReadinessScore};
use crate::risk::{r_multiple, risk_reward};
use crate::types::*;
use crate::JournalResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    Open,
    Closed,
}

/// A journal entry: one open or closed position.
///
/// `status`, `metrics` and `r_multiple` are derived and recomputed on every
/// change to prices, size, direction or symbol. They are never read back
/// when a trade is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TradeRecord")]
pub struct Trade {
    pub id: String,
    /// When the position was opened
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<DateTime<Utc>>,
    pub symbol: String,
    pub market: MarketCategory,
    pub direction: Direction,
    pub status: TradeStatus,
    pub entry_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<Price>,
    /// Zero means not set
    #[serde(default)]
    pub stop_loss: Price,
    /// Zero means not set
    #[serde(default)]
    pub take_profit: Price,
    pub position_size: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TradeMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_multiple: Option<Rate>,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub timeframe: String,
    /// Time in trade, milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pre_emotion: String,
    #[serde(default)]
    pub post_emotion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psych: Option<PsychAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<PostTradeReflection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored shape of a [`Trade`], without the derived fields.
#[derive(Deserialize)]
struct TradeRecord {
    id: String,
    date: DateTime<Utc>,
    #[serde(default)]
    exit_date: Option<DateTime<Utc>>,
    symbol: String,
    #[serde(default)]
    market: Option<MarketCategory>,
    direction: Direction,
    entry_price: Price,
    #[serde(default)]
    exit_price: Option<Price>,
    #[serde(default)]
    stop_loss: Price,
    #[serde(default)]
    take_profit: Price,
    position_size: Decimal,
    #[serde(default)]
    strategy: String,
    #[serde(default)]
    timeframe: String,
    #[serde(default)]
    duration_ms: Option<i64>,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    pre_emotion: String,
    #[serde(default)]
    post_emotion: String,
    #[serde(default)]
    psych: Option<PsychAssessment>,
    #[serde(default)]
    reflection: Option<PostTradeReflection>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TradeRecord> for Trade {
    fn from(r: TradeRecord) -> Self {
        let market = r.market.unwrap_or_else(|| classify(&r.symbol));
        let mut trade = Trade {
            id: r.id,
            date: r.date,
            exit_date: r.exit_date,
            symbol: r.symbol,
            market,
            direction: r.direction,
            status: TradeStatus::Open,
            entry_price: r.entry_price,
            exit_price: r.exit_price,
            stop_loss: r.stop_loss,
            take_profit: r.take_profit,
            position_size: r.position_size,
            metrics: None,
            r_multiple: None,
            strategy: r.strategy,
            timeframe: r.timeframe,
            duration_ms: r.duration_ms,
            notes: r.notes,
            tags: r.tags,
            pre_emotion: r.pre_emotion,
            post_emotion: r.post_emotion,
            psych: r.psych,
            reflection: r.reflection,
            created_at: r.created_at,
            updated_at: r.updated_at,
        };
        trade.recompute();
        trade
    }
}

/// User-entered fields for a new trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub symbol: String,
    /// Derived from the symbol when absent
    #[serde(default)]
    pub market: Option<MarketCategory>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub entry_price: Price,
    #[serde(default)]
    pub exit_price: Option<Price>,
    #[serde(default)]
    pub exit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_loss: Price,
    #[serde(default)]
    pub take_profit: Price,
    #[serde(default = "default_position_size")]
    pub position_size: Decimal,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pre_emotion: String,
    #[serde(default)]
    pub post_emotion: String,
    #[serde(default)]
    pub psych: Option<PsychAssessment>,
    #[serde(default)]
    pub reflection: Option<PostTradeReflection>,
}

impl Default for TradeDraft {
    fn default() -> Self {
        Self {
            id: None,
            symbol: String::new(),
            market: None,
            direction: Direction::Long,
            date: None,
            entry_price: Decimal::ZERO,
            exit_price: None,
            exit_date: None,
            stop_loss: Decimal::ZERO,
            take_profit: Decimal::ZERO,
            position_size: Decimal::ONE,
            strategy: String::new(),
            timeframe: String::new(),
            duration_ms: None,
            notes: String::new(),
            tags: Vec::new(),
            pre_emotion: String::new(),
            post_emotion: String::new(),
            psych: None,
            reflection: None,
        }
    }
}

/// Field-level edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeEdit {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market: Option<MarketCategory>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entry_price: Option<Price>,
    #[serde(default)]
    pub exit_price: Option<Price>,
    #[serde(default)]
    pub exit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_loss: Option<Price>,
    #[serde(default)]
    pub take_profit: Option<Price>,
    #[serde(default)]
    pub position_size: Option<Decimal>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
    /// Overrides the duration derived from entry and exit dates
    #[serde(default)]
    pub duration_ms: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub pre_emotion: Option<String>,
    #[serde(default)]
    pub post_emotion: Option<String>,
    #[serde(default)]
    pub psych: Option<PsychAssessment>,
    #[serde(default)]
    pub reflection: Option<PostTradeReflection>,
}

impl TradeDraft {
    pub fn validate(&self) -> JournalResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(JournalError::invalid("symbol", "Symbol is required"));
        }
        validate_prices(
            self.entry_price,
            self.exit_price,
            self.position_size,
            self.stop_loss,
            self.take_profit,
        )?;
        if let (Some(opened), Some(closed)) = (self.date, self.exit_date) {
            if closed < opened {
                return Err(JournalError::invalid("exit_date", "Exit date precedes entry date"));
            }
        }
        if let Some(exit) = self.exit_price {
            checked_trade_metrics(
                self.direction,
                self.entry_price,
                exit,
                self.position_size,
                &normalize_symbol(&self.symbol),
            )
            .ok_or_else(|| out_of_range("position_size"))?;
        }
        if matches!(self.duration_ms, Some(ms) if ms < 0) {
            return Err(JournalError::invalid("duration_ms", "Duration cannot be negative"));
        }
        if let Some(psych) = &self.psych {
            psych.validate()?;
        }
        if let Some(reflection) = &self.reflection {
            reflection.validate()?;
        }
        Ok(())
    }
}

impl Trade {
    /// Build a trade from a draft, deriving market, status and metrics.
    pub fn from_draft(draft: TradeDraft, now: DateTime<Utc>) -> Self {
        let symbol = normalize_symbol(&draft.symbol);
        let market = draft.market.unwrap_or_else(|| classify(&symbol));
        let date = draft.date.unwrap_or(now);
        let status = if draft.exit_price.is_some() {
            TradeStatus::Closed
        } else {
            TradeStatus::Open
        };
        let exit_date = match status {
            TradeStatus::Closed => draft.exit_date.or(Some(date)),
            TradeStatus::Open => None,
        };
        let duration_ms = draft
            .duration_ms
            .or_else(|| exit_date.map(|exit| (exit - date).num_milliseconds()));

        let mut trade = Trade {
            id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            date,
            exit_date,
            symbol,
            market,
            direction: draft.direction,
            status,
            entry_price: draft.entry_price,
            exit_price: draft.exit_price,
            stop_loss: draft.stop_loss,
            take_profit: draft.take_profit,
            position_size: draft.position_size,
            metrics: None,
            r_multiple: None,
            strategy: draft.strategy,
            timeframe: draft.timeframe,
            duration_ms,
            notes: draft.notes,
            tags: draft.tags,
            pre_emotion: draft.pre_emotion,
            post_emotion: draft.post_emotion,
            psych: draft.psych,
            reflection: draft.reflection,
            created_at: now,
            updated_at: now,
        };
        trade.recompute();
        trade
    }

    /// Recompute every derived field from the current inputs.
    ///
    /// A closed trade whose values overflow is left without metrics.
    pub fn recompute(&mut self) {
        self.status = if self.exit_price.is_some() {
            TradeStatus::Closed
        } else {
            TradeStatus::Open
        };
        self.metrics = self.exit_price.and_then(|exit| {
            checked_trade_metrics(
                self.direction,
                self.entry_price,
                exit,
                self.position_size,
                &self.symbol,
            )
        });
        self.r_multiple = self
            .metrics
            .and_then(|m| r_multiple(self.entry_price, self.stop_loss, m.pnl, self.position_size));
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    pub fn pnl(&self) -> Option<Money> {
        self.metrics.map(|m| m.pnl)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.metrics.map(|m| m.outcome)
    }

    /// Date the trade is attributed to in daily breakdowns.
    pub fn settled_date(&self) -> DateTime<Utc> {
        self.exit_date.unwrap_or(self.date)
    }

    /// Planned reward:risk from stop and target, when both are set.
    pub fn planned_risk_reward(&self) -> Option<Rate> {
        if self.stop_loss.is_zero() || self.take_profit.is_zero() {
            return None;
        }
        Some(risk_reward(
            self.entry_price,
            self.stop_loss,
            self.take_profit,
            self.direction,
        ))
    }

    /// Time between entry and exit, when the trade has an exit date.
    fn derived_duration(&self) -> Option<i64> {
        self.exit_date.map(|exit| (exit - self.date).num_milliseconds())
    }

    pub fn readiness(&self) -> ReadinessScore {
        score_readiness(self.psych.as_ref())
    }

    /// Exit an open position and recompute derived fields.
    pub fn close(
        &mut self,
        exit_price: Price,
        exit_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> JournalResult<()> {
        if self.is_closed() {
            return Err(JournalError::TradeAlreadyClosed(self.id.clone()));
        }
        if exit_price <= Decimal::ZERO {
            return Err(JournalError::invalid("exit_price", "Exit price must be greater than 0"));
        }
        let exit_date = exit_date.unwrap_or(now);
        if exit_date < self.date {
            return Err(JournalError::invalid("exit_date", "Exit date precedes entry date"));
        }

        checked_trade_metrics(
            self.direction,
            self.entry_price,
            exit_price,
            self.position_size,
            &self.symbol,
        )
        .ok_or_else(|| out_of_range("exit_price"))?;

        self.exit_price = Some(exit_price);
        self.exit_date = Some(exit_date);
        if self.duration_ms.is_none() {
            self.duration_ms = Some((exit_date - self.date).num_milliseconds());
        }
        self.updated_at = now;
        self.recompute();
        Ok(())
    }

    /// Apply user edits. The edited trade is validated before anything changes.
    pub fn apply_edit(&mut self, edit: TradeEdit, now: DateTime<Utc>) -> JournalResult<()> {
        if edit.exit_date.is_some() && self.exit_price.is_none() && edit.exit_price.is_none() {
            return Err(JournalError::invalid(
                "exit_date",
                "An open trade needs an exit price before an exit date",
            ));
        }
        let duration_derived =
            self.duration_ms.is_none() || self.duration_ms == self.derived_duration();
        let mut next = self.clone();

        if let Some(symbol) = edit.symbol {
            if symbol.trim().is_empty() {
                return Err(JournalError::invalid("symbol", "Symbol is required"));
            }
            next.symbol = normalize_symbol(&symbol);
            if edit.market.is_none() {
                next.market = classify(&next.symbol);
            }
        }
        if let Some(market) = edit.market {
            next.market = market;
        }
        if let Some(direction) = edit.direction {
            next.direction = direction;
        }
        if let Some(date) = edit.date {
            next.date = date;
        }
        if let Some(entry) = edit.entry_price {
            next.entry_price = entry;
        }
        if let Some(exit) = edit.exit_price {
            next.exit_price = Some(exit);
            if next.exit_date.is_none() && edit.exit_date.is_none() {
                next.exit_date = Some(now);
            }
        }
        if let Some(exit_date) = edit.exit_date {
            next.exit_date = Some(exit_date);
        }
        if let Some(stop) = edit.stop_loss {
            next.stop_loss = stop;
        }
        if let Some(target) = edit.take_profit {
            next.take_profit = target;
        }
        if let Some(size) = edit.position_size {
            next.position_size = size;
        }
        if let Some(strategy) = edit.strategy {
            next.strategy = strategy;
        }
        if let Some(timeframe) = edit.timeframe {
            next.timeframe = timeframe;
        }
        match edit.duration_ms {
            Some(ms) if ms < 0 => {
                return Err(JournalError::invalid("duration_ms", "Duration cannot be negative"));
            }
            Some(ms) => next.duration_ms = Some(ms),
            None if duration_derived => next.duration_ms = next.derived_duration(),
            None => {}
        }
        if let Some(notes) = edit.notes {
            next.notes = notes;
        }
        if let Some(tags) = edit.tags {
            next.tags = tags;
        }
        if let Some(pre) = edit.pre_emotion {
            next.pre_emotion = pre;
        }
        if let Some(post) = edit.post_emotion {
            next.post_emotion = post;
        }
        if let Some(psych) = edit.psych {
            psych.validate()?;
            next.psych = Some(psych);
        }
        if let Some(reflection) = edit.reflection {
            reflection.validate()?;
            next.reflection = Some(reflection);
        }

        validate_prices(
            next.entry_price,
            next.exit_price,
            next.position_size,
            next.stop_loss,
            next.take_profit,
        )?;
        if let Some(exit_date) = next.exit_date {
            if exit_date < next.date {
                return Err(JournalError::invalid("exit_date", "Exit date precedes entry date"));
            }
        }

        next.updated_at = now;
        next.recompute();
        if next.exit_price.is_some() && next.metrics.is_none() {
            return Err(out_of_range("position_size"));
        }
        *self = next;
        Ok(())
    }
}

fn validate_prices(
    entry: Price,
    exit: Option<Price>,
    size: Decimal,
    stop_loss: Price,
    take_profit: Price,
) -> JournalResult<()> {
    if entry <= Decimal::ZERO {
        return Err(JournalError::invalid("entry_price", "Entry price must be greater than 0"));
    }
    if let Some(exit) = exit {
        if exit <= Decimal::ZERO {
            return Err(JournalError::invalid("exit_price", "Exit price must be greater than 0"));
        }
    }
    if size <= Decimal::ZERO {
        return Err(JournalError::invalid(
            "position_size",
            "Position size must be greater than 0",
        ));
    }
    if stop_loss < Decimal::ZERO {
        return Err(JournalError::invalid("stop_loss", "Stop loss cannot be negative"));
    }
    if take_profit < Decimal::ZERO {
        return Err(JournalError::invalid("take_profit", "Take profit cannot be negative"));
    }
    Ok(())
}
