use serde::{Deserialize, Serialize};

use super::conventions::normalize_symbol;
use crate::types::MarketCategory;

/// A pickable symbol and the category it is listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub symbol: String,
    pub market: MarketCategory,
}

const FOREX: &[&str] = &[
    "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD", "USDCHF", "NZDUSD", "EURJPY", "GBPJPY",
    "CHFJPY", "AUDJPY", "CADJPY", "NZDJPY", "AUDCAD", "AUDNZD", "CADCHF", "EURAUD", "EURCAD",
];

const CRYPTO: &[&str] = &[
    "BTCUSD", "ETHUSD", "SOLUSD", "BNBUSD", "XRPUSD", "ADAUSD", "DOGEUSD", "MATICUSD", "AVAXUSD",
    "LTCUSD", "ATOMUSD", "SHIBUSDT",
];

const STOCKS: &[&str] = &[
    "AAPL", "NVDA", "TSLA", "AMZN", "MSFT", "GOOGL", "META", "NFLX", "AMD", "JPM", "BAC", "JNJ",
    "WMT", "HD", "V", "PG",
];

const INDICES: &[&str] = &["SPX", "NDX", "DJI", "RUT", "VIX", "FTSE", "DAX", "NKY", "HSI"];

const COMMODITIES: &[&str] = &["XAUUSD", "XAGUSD", "CL", "NG", "ZC", "ZW", "ZS"];

/// Symbols listed under a category in the picker. `Other` has none.
///
/// Listing is editorial: a listed symbol may classify differently under
/// [`super::classify`] (e.g. `BTCUSD` is listed as crypto).
pub fn symbols_for(market: MarketCategory) -> &'static [&'static str] {
    match market {
        MarketCategory::Forex => FOREX,
        MarketCategory::Crypto => CRYPTO,
        MarketCategory::Stocks => STOCKS,
        MarketCategory::Indices => INDICES,
        MarketCategory::Commodities => COMMODITIES,
        MarketCategory::Other => &[],
    }
}

/// Every catalog entry, in category then listing order.
pub fn all_entries() -> Vec<CatalogEntry> {
    MarketCategory::ALL
        .iter()
        .flat_map(|&market| {
            symbols_for(market).iter().map(move |s| CatalogEntry {
                symbol: (*s).to_string(),
                market,
            })
        })
        .collect()
}

/// Catalog entries whose symbol contains `query`, optionally restricted to one category.
pub fn search_symbols(query: &str, market: Option<MarketCategory>) -> Vec<CatalogEntry> {
    let needle = normalize_symbol(query);
    all_entries()
        .into_iter()
        .filter(|e| market.map_or(true, |m| e.market == m))
        .filter(|e| e.symbol.contains(&needle))
        .collect()
}
