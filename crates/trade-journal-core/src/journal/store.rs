use chrono::{DateTime, Utc};

use super::filter::{TradeFilter, TradeSort};
use super::repository::TradeRepository;
use crate::analytics::{
    analyze_journal, equity_curve, summarize, EquityPoint, JournalAnalyticsInput,
    JournalAnalyticsOutput, JournalSummary,
};
use crate::error::JournalError;
use crate::trade::{Trade, TradeDraft, TradeEdit};
use crate::types::*;
use crate::JournalResult;

/// Owns a trade collection through a repository and runs the pure
/// calculators on every read and write.
pub struct Journal<R: TradeRepository> {
    repo: R,
}

impl<R: TradeRepository> Journal<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validate a draft and store the resulting trade.
    pub fn record(&mut self, draft: TradeDraft) -> JournalResult<Trade> {
        self.record_at(draft, Utc::now())
    }

    pub fn record_at(&mut self, draft: TradeDraft, now: DateTime<Utc>) -> JournalResult<Trade> {
        draft.validate()?;
        let trade = Trade::from_draft(draft, now);
        self.repo.create(trade.clone())?;
        tracing::debug!(id = %trade.id, symbol = %trade.symbol, status = ?trade.status, "trade recorded");
        Ok(trade)
    }

    /// Exit an open trade at `exit_price`.
    pub fn close(
        &mut self,
        id: &str,
        exit_price: Price,
        exit_date: Option<DateTime<Utc>>,
    ) -> JournalResult<Trade> {
        let mut trade = self.require(id)?;
        trade.close(exit_price, exit_date, Utc::now())?;
        self.repo.update(trade.clone())?;
        tracing::debug!(id, pnl = ?trade.pnl(), "trade closed");
        Ok(trade)
    }

    pub fn edit(&mut self, id: &str, edit: TradeEdit) -> JournalResult<Trade> {
        let mut trade = self.require(id)?;
        trade.apply_edit(edit, Utc::now())?;
        self.repo.update(trade.clone())?;
        tracing::debug!(id, "trade edited");
        Ok(trade)
    }

    pub fn delete(&mut self, id: &str) -> JournalResult<()> {
        self.repo.delete(id)?;
        tracing::debug!(id, "trade deleted");
        Ok(())
    }

    pub fn get(&self, id: &str) -> JournalResult<Option<Trade>> {
        self.repo.get(id)
    }

    /// Filtered and sorted view of the collection.
    pub fn trades(&self, filter: &TradeFilter, sort: TradeSort) -> JournalResult<Vec<Trade>> {
        let mut trades: Vec<Trade> = self
            .repo
            .list()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        sort.apply(&mut trades);
        Ok(trades)
    }

    pub fn summary(&self) -> JournalResult<JournalSummary> {
        Ok(summarize(&self.repo.list()?))
    }

    pub fn equity_curve(&self, starting_balance: Option<Money>) -> JournalResult<Vec<EquityPoint>> {
        Ok(equity_curve(&self.repo.list()?, starting_balance))
    }

    pub fn analytics(
        &self,
        starting_balance: Option<Money>,
    ) -> JournalResult<ComputationOutput<JournalAnalyticsOutput>> {
        analyze_journal(&JournalAnalyticsInput {
            trades: self.repo.list()?,
            starting_balance,
        })
    }

    fn require(&self, id: &str) -> JournalResult<Trade> {
        self.repo
            .get(id)?
            .ok_or_else(|| JournalError::TradeNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::InMemoryRepository;
    use rust_decimal_macros::dec;

    fn draft(symbol: &str) -> TradeDraft {
        TradeDraft {
            symbol: symbol.into(),
            entry_price: dec!(100),
            position_size: dec!(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_record_close_summary() {
        let mut journal = Journal::new(InMemoryRepository::new());
        let t = journal.record(draft("AAPL")).unwrap();
        assert!(!t.is_closed());
        assert_eq!(journal.summary().unwrap().closed_trades, 0);

        let closed = journal.close(&t.id, dec!(110), None).unwrap();
        assert_eq!(closed.pnl(), Some(dec!(20)));

        let summary = journal.summary().unwrap();
        assert_eq!(summary.closed_trades, 1);
        assert_eq!(summary.total_pnl, dec!(20));
    }

    #[test]
    fn test_record_rejects_invalid_draft() {
        let mut journal = Journal::new(InMemoryRepository::new());
        let err = journal.record(draft("")).unwrap_err();
        assert!(matches!(err, JournalError::InvalidInput { .. }));
        assert!(journal.trades(&TradeFilter::default(), TradeSort::default()).unwrap().is_empty());
    }

    #[test]
    fn test_close_unknown_trade() {
        let mut journal = Journal::new(InMemoryRepository::new());
        let err = journal.close("nope", dec!(1), None).unwrap_err();
        assert!(matches!(err, JournalError::TradeNotFound(_)));
    }

    #[test]
    fn test_edit_recomputes() {
        let mut journal = Journal::new(InMemoryRepository::new());
        let t = journal.record(draft("AAPL")).unwrap();
        journal.close(&t.id, dec!(110), None).unwrap();
        let edited = journal
            .edit(
                &t.id,
                TradeEdit {
                    direction: Some(Direction::Short),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.pnl(), Some(dec!(-20)));
        assert_eq!(edited.outcome(), Some(Outcome::Loss));
    }

    #[test]
    fn test_delete_removes_from_curve() {
        let mut journal = Journal::new(InMemoryRepository::new());
        let a = journal.record(draft("AAPL")).unwrap();
        journal.close(&a.id, dec!(105), None).unwrap();
        assert_eq!(journal.equity_curve(None).unwrap().len(), 1);
        journal.delete(&a.id).unwrap();
        assert!(journal.equity_curve(None).unwrap().is_empty());
    }
}
