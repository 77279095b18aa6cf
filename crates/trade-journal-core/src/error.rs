use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Trade not found: {0}")]
    TradeNotFound(String),

    #[error("Duplicate trade id: {0}")]
    DuplicateTrade(String),

    #[error("Trade already closed: {0}")]
    TradeAlreadyClosed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl JournalError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        JournalError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(e: serde_json::Error) -> Self {
        JournalError::SerializationError(e.to_string())
    }
}
