use chrono::{DateTime, Utc};
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use trade_journal_core::journal::{TradeFilter, TradeSort};
use trade_journal_core::trade::{Trade, TradeDraft, TradeEdit};
use trade_journal_core::MarketCategory;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> NapiResult<T> {
    serde_json::from_str(json).map_err(to_napi_error)
}

fn render<T: serde::Serialize>(value: &T) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Instruments
// ---------------------------------------------------------------------------

#[napi]
pub fn classify_symbol(symbol: String) -> NapiResult<String> {
    use trade_journal_core::instruments::{classify, normalize_symbol, pip_size};
    render(&serde_json::json!({
        "symbol": normalize_symbol(&symbol),
        "market": classify(&symbol),
        "pip_size": pip_size(&symbol),
    }))
}

#[napi]
pub fn search_symbols(query: String, market: Option<String>) -> NapiResult<String> {
    let market: Option<MarketCategory> = market
        .map(|m| serde_json::from_value(serde_json::Value::String(m.to_lowercase())))
        .transpose()
        .map_err(to_napi_error)?;
    render(&trade_journal_core::instruments::catalog::search_symbols(&query, market))
}

// ---------------------------------------------------------------------------
// Trade metrics and risk
// ---------------------------------------------------------------------------

#[napi]
pub fn trade_metrics(input_json: String) -> NapiResult<String> {
    let input: trade_journal_core::trade::metrics::TradeMetricsInput = parse(&input_json)?;
    let output = trade_journal_core::trade::metrics::analyze_trade(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn position_size(input_json: String) -> NapiResult<String> {
    let input: trade_journal_core::risk::sizing::PositionSizingInput = parse(&input_json)?;
    let output =
        trade_journal_core::risk::sizing::analyze_position_size(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn price_size(input_json: String) -> NapiResult<String> {
    let input: trade_journal_core::risk::sizing::PriceSizingInput = parse(&input_json)?;
    let output =
        trade_journal_core::risk::sizing::analyze_price_sizing(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn risk_reward(input_json: String) -> NapiResult<String> {
    let input: trade_journal_core::risk::reward::RiskRewardInput = parse(&input_json)?;
    let output =
        trade_journal_core::risk::reward::analyze_risk_reward(&input).map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Psychology
// ---------------------------------------------------------------------------

#[napi]
pub fn readiness_score(input_json: String) -> NapiResult<String> {
    let input: trade_journal_core::psychology::PsychAssessment = parse(&input_json)?;
    let output = trade_journal_core::psychology::readiness::analyze_readiness(&input)
        .map_err(to_napi_error)?;
    render(&output)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[napi]
pub fn journal_analytics(input_json: String) -> NapiResult<String> {
    let input: trade_journal_core::analytics::JournalAnalyticsInput = parse(&input_json)?;
    let output = trade_journal_core::analytics::analyze_journal(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn equity_curve(input_json: String) -> NapiResult<String> {
    let input: trade_journal_core::analytics::JournalAnalyticsInput = parse(&input_json)?;
    render(&trade_journal_core::analytics::equity_curve(
        &input.trades,
        input.starting_balance,
    ))
}

// ---------------------------------------------------------------------------
// Trade lifecycle (the UI owns storage, these return the updated record)
// ---------------------------------------------------------------------------

#[napi]
pub fn create_trade(draft_json: String) -> NapiResult<String> {
    let draft: TradeDraft = parse(&draft_json)?;
    draft.validate().map_err(to_napi_error)?;
    render(&Trade::from_draft(draft, Utc::now()))
}

#[derive(Deserialize)]
struct CloseRequest {
    trade: Trade,
    exit_price: Decimal,
    #[serde(default)]
    exit_date: Option<DateTime<Utc>>,
}

#[napi]
pub fn close_trade(request_json: String) -> NapiResult<String> {
    let CloseRequest {
        mut trade,
        exit_price,
        exit_date,
    } = parse(&request_json)?;
    trade
        .close(exit_price, exit_date, Utc::now())
        .map_err(to_napi_error)?;
    render(&trade)
}

#[derive(Deserialize)]
struct EditRequest {
    trade: Trade,
    edit: TradeEdit,
}

#[napi]
pub fn edit_trade(request_json: String) -> NapiResult<String> {
    let EditRequest { mut trade, edit } = parse(&request_json)?;
    trade.apply_edit(edit, Utc::now()).map_err(to_napi_error)?;
    render(&trade)
}

#[derive(Deserialize)]
struct ListRequest {
    trades: Vec<Trade>,
    #[serde(default)]
    filter: TradeFilter,
    #[serde(default)]
    sort: TradeSort,
}

#[napi]
pub fn list_trades(request_json: String) -> NapiResult<String> {
    let ListRequest {
        trades,
        filter,
        sort,
    } = parse(&request_json)?;
    let mut visible: Vec<Trade> = trades.into_iter().filter(|t| filter.matches(t)).collect();
    sort.apply(&mut visible);
    render(&visible)
}
