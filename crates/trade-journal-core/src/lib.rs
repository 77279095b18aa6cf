pub mod error;
pub mod instruments;
pub mod types;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "psychology")]
pub mod psychology;

#[cfg(feature = "trade")]
pub mod trade;

#[cfg(feature = "analytics")]
pub mod analytics;

#[cfg(feature = "journal")]
pub mod journal;

pub use error::JournalError;
pub use types::*;

/// Standard result type for all trade-journal operations
pub type JournalResult<T> = Result<T, JournalError>;
