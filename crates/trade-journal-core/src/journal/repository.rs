use crate::error::JournalError;
use crate::trade::Trade;
use crate::JournalResult;

/// Storage port for trade records.
///
/// Implementations own persistence only; every derived field is computed
/// by [`Trade`] before it reaches the repository.
pub trait TradeRepository: Send + Sync {
    /// All trades in insertion order.
    fn list(&self) -> JournalResult<Vec<Trade>>;
    fn get(&self, id: &str) -> JournalResult<Option<Trade>>;
    fn create(&mut self, trade: Trade) -> JournalResult<()>;
    fn update(&mut self, trade: Trade) -> JournalResult<()>;
    fn delete(&mut self, id: &str) -> JournalResult<()>;
}

/// Vec-backed repository, mostly for tests and one-shot CLI runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    trades: Vec<Trade>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<Trade>) -> Self {
        Self { trades }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.trades.iter().position(|t| t.id == id)
    }
}

impl TradeRepository for InMemoryRepository {
    fn list(&self) -> JournalResult<Vec<Trade>> {
        Ok(self.trades.clone())
    }

    fn get(&self, id: &str) -> JournalResult<Option<Trade>> {
        Ok(self.trades.iter().find(|t| t.id == id).cloned())
    }

    fn create(&mut self, trade: Trade) -> JournalResult<()> {
        if self.position(&trade.id).is_some() {
            return Err(JournalError::DuplicateTrade(trade.id));
        }
        self.trades.push(trade);
        Ok(())
    }

    fn update(&mut self, trade: Trade) -> JournalResult<()> {
        let idx = self
            .position(&trade.id)
            .ok_or_else(|| JournalError::TradeNotFound(trade.id.clone()))?;
        self.trades[idx] = trade;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> JournalResult<()> {
        let idx = self
            .position(id)
            .ok_or_else(|| JournalError::TradeNotFound(id.to_string()))?;
        self.trades.remove(idx);
        Ok(())
    }
}
