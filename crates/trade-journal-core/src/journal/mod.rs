pub mod filter;
pub mod repository;
pub mod store;

pub use filter::{SortField, SortOrder, TradeFilter, TradeSort};
pub use repository::{InMemoryRepository, TradeRepository};
pub use store::Journal;
