use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::MarketCategory;

const FOREX_CODES: [&str; 4] = ["USD", "JPY", "EUR", "GBP"];
const CRYPTO_CODES: [&str; 4] = ["BTC", "ETH", "XRP", "USDT"];
const INDEX_CODES: [&str; 3] = ["SPX", "DAX", "FTSE"];
const COMMODITY_CODES: [&str; 3] = ["GC", "CL", "NG"];

const JPY_PIP: Decimal = dec!(0.01);
const DEFAULT_PIP: Decimal = dec!(0.0001);

/// Trim and ASCII-uppercase a user-entered symbol.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

/// Resolve the market category of a symbol.
///
/// Rules are checked in a fixed order and the first match wins:
/// forex codes, crypto tickers, short all-caps equity tickers (not
/// containing USD), index tickers, commodity codes, else `Other`.
/// The rules are plain substring checks, so e.g. `BTCUSD` classifies as
/// forex and `SPX` as stocks.
pub fn classify(symbol: &str) -> MarketCategory {
    let upper = normalize_symbol(symbol);
    if upper.is_empty() {
        return MarketCategory::Other;
    }

    if contains_any(&upper, &FOREX_CODES) {
        return MarketCategory::Forex;
    }
    if contains_any(&upper, &CRYPTO_CODES) {
        return MarketCategory::Crypto;
    }
    if is_equity_ticker(&upper) && !upper.contains("USD") {
        return MarketCategory::Stocks;
    }
    if contains_any(&upper, &INDEX_CODES) {
        return MarketCategory::Indices;
    }
    if contains_any(&upper, &COMMODITY_CODES) {
        return MarketCategory::Commodities;
    }
    MarketCategory::Other
}

/// Pip size used for distance math: 0.01 for JPY pairs, 0.0001 otherwise.
///
/// Applied to every instrument, including equities and crypto.
pub fn pip_size(symbol: &str) -> Decimal {
    if normalize_symbol(symbol).contains("JPY") {
        JPY_PIP
    } else {
        DEFAULT_PIP
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// One to five ASCII capital letters and nothing else.
fn is_equity_ticker(symbol: &str) -> bool {
    (1..=5).contains(&symbol.len()) && symbol.bytes().all(|b| b.is_ascii_uppercase())
}
