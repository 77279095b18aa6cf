use serde::{Deserialize, Serialize};

use crate::error::JournalError;
use crate::JournalResult;

/// Post-trade reflection captured when a position is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTradeReflection {
    /// e.g. "Relief", "Frustration", "Euphoria"
    pub reaction: String,
    /// 1-5
    pub intensity: u8,
    #[serde(default)]
    pub urge_to_trade_again: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urge_reason: Option<String>,
    /// e.g. "Rules followed, emotions calm"
    #[serde(default)]
    pub alignment: String,
    /// One-word (or emoji) label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl PostTradeReflection {
    pub fn validate(&self) -> JournalResult<()> {
        if !(1..=5).contains(&self.intensity) {
            return Err(JournalError::invalid(
                "intensity",
                "Intensity must be between 1 and 5",
            ));
        }
        if self.urge_reason.is_some() && !self.urge_to_trade_again {
            return Err(JournalError::invalid(
                "urge_reason",
                "An urge reason requires urge_to_trade_again",
            ));
        }
        Ok(())
    }
}
