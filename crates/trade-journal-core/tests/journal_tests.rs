use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use trade_journal_core::journal::{
    InMemoryRepository, Journal, SortField, SortOrder, TradeFilter, TradeSort,
};
use trade_journal_core::psychology::PsychAssessment;
use trade_journal_core::trade::{Trade, TradeDraft, TradeEdit, TradeStatus};
use trade_journal_core::{Direction, JournalError, MarketCategory, Outcome};

fn draft(symbol: &str, entry: rust_decimal::Decimal) -> TradeDraft {
    TradeDraft {
        symbol: symbol.into(),
        entry_price: entry,
        date: Some(Utc::now() - Duration::hours(1)),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_open_then_close_lifecycle() {
    let mut journal = Journal::new(InMemoryRepository::new());
    let trade = journal
        .record(TradeDraft {
            direction: Direction::Short,
            stop_loss: dec!(1.0900),
            take_profit: dec!(1.0750),
            position_size: dec!(10000),
            ..draft(" eurusd ", dec!(1.0850))
        })
        .unwrap();

    assert_eq!(trade.symbol, "EURUSD");
    assert_eq!(trade.market, MarketCategory::Forex);
    assert_eq!(trade.status, TradeStatus::Open);
    assert_eq!(trade.metrics, None);
    assert_eq!(trade.planned_risk_reward(), Some(dec!(2)));

    let closed = journal.close(&trade.id, dec!(1.0800), None).unwrap();
    assert_eq!(closed.status, TradeStatus::Closed);
    assert_eq!(closed.pnl(), Some(dec!(50)));
    assert_eq!(closed.outcome(), Some(Outcome::Win));
    assert_eq!(closed.metrics.map(|m| m.pips), Some(dec!(50)));
    // risked 0.0050 * 10000 = 50
    assert_eq!(closed.r_multiple, Some(dec!(1)));
    assert!(closed.duration_ms.unwrap_or_default() >= 0);

    let again = journal.close(&trade.id, dec!(1.0700), None).unwrap_err();
    assert!(matches!(again, JournalError::TradeAlreadyClosed(_)));
}

#[test]
fn test_edit_symbol_reclassifies_and_recomputes() {
    let mut journal = Journal::new(InMemoryRepository::new());
    let trade = journal
        .record(TradeDraft {
            exit_price: Some(dec!(151)),
            ..draft("USDJPY", dec!(150))
        })
        .unwrap();
    assert_eq!(trade.metrics.map(|m| m.pips), Some(dec!(100)));

    let edited = journal
        .edit(
            &trade.id,
            TradeEdit {
                symbol: Some("aapl".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(edited.market, MarketCategory::Stocks);
    assert_eq!(edited.metrics.map(|m| m.pips), Some(dec!(10000)));
    assert_eq!(edited.pnl(), Some(dec!(1)));
}

#[test]
fn test_invalid_edit_leaves_trade_untouched() {
    let mut journal = Journal::new(InMemoryRepository::new());
    let trade = journal.record(draft("AAPL", dec!(100))).unwrap();
    let err = journal
        .edit(
            &trade.id,
            TradeEdit {
                position_size: Some(dec!(0)),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, JournalError::InvalidInput { .. }));
    let stored = journal.get(&trade.id).unwrap().unwrap();
    assert_eq!(stored.position_size, dec!(1));
}

#[test]
fn test_record_rejects_out_of_range_rating() {
    let mut journal = Journal::new(InMemoryRepository::new());
    let err = journal
        .record(TradeDraft {
            psych: Some(PsychAssessment {
                urgency: 6,
                ..Default::default()
            }),
            ..draft("AAPL", dec!(100))
        })
        .unwrap_err();
    assert!(matches!(err, JournalError::InvalidInput { field, .. } if field == "urgency"));
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[test]
fn test_filter_and_sort_through_journal() {
    let base = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let mut journal = Journal::new(InMemoryRepository::new());
    for (i, (symbol, exit)) in [
        ("EURUSD", dec!(1.10)),
        ("GBPUSD", dec!(1.30)),
        ("AAPL", dec!(90)),
    ]
    .into_iter()
    .enumerate()
    {
        let entry = if symbol == "AAPL" { dec!(100) } else { dec!(1.20) };
        journal
            .record_at(
                TradeDraft {
                    symbol: symbol.into(),
                    date: Some(base + Duration::days(i as i64)),
                    entry_price: entry,
                    exit_price: Some(exit),
                    ..Default::default()
                },
                base,
            )
            .unwrap();
    }

    let usd = journal
        .trades(
            &TradeFilter {
                market: Some("usd".into()),
                ..Default::default()
            },
            TradeSort {
                field: SortField::Symbol,
                order: SortOrder::Asc,
            },
        )
        .unwrap();
    let symbols: Vec<&str> = usd.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["EURUSD", "GBPUSD"]);

    let losers = journal
        .trades(
            &TradeFilter {
                outcome: Some(Outcome::Loss),
                ..Default::default()
            },
            TradeSort::default(),
        )
        .unwrap();
    let symbols: Vec<&str> = losers.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "EURUSD"]);
}

// ---------------------------------------------------------------------------
// Persistence shape
// ---------------------------------------------------------------------------

#[test]
fn test_trade_json_uses_wire_names() {
    let trade = Trade::from_draft(
        TradeDraft {
            id: Some("t-1".into()),
            exit_price: Some(dec!(100)),
            ..draft("AAPL", dec!(100))
        },
        Utc::now(),
    );
    let json = serde_json::to_value(&trade).unwrap();
    assert_eq!(json["direction"], "long");
    assert_eq!(json["market"], "stocks");
    assert_eq!(json["status"], "closed");
    assert_eq!(json["metrics"]["outcome"], "break-even");

    let back: Trade = serde_json::from_value(json).unwrap();
    assert_eq!(back, trade);
}
