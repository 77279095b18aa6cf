pub mod metrics;
pub mod record;

pub use metrics::{checked_trade_metrics, compute_trade_metrics, TradeMetrics};
pub use record::{Trade, TradeDraft, TradeEdit, TradeStatus};
