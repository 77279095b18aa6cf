use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trade_journal_core::analytics::{
    analyze_journal, equity_curve, summarize, JournalAnalyticsInput, ProfitFactor,
};
use trade_journal_core::trade::{Trade, TradeDraft};
use trade_journal_core::Direction;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

/// Long AAPL trade of size 1 closed at `entry + pnl`.
fn closed_with_pnl(id: &str, date: DateTime<Utc>, pnl: Decimal) -> Trade {
    Trade::from_draft(
        TradeDraft {
            id: Some(id.into()),
            symbol: "AAPL".into(),
            date: Some(date),
            entry_price: dec!(100),
            exit_price: Some(dec!(100) + pnl),
            ..Default::default()
        },
        date,
    )
}

fn open(id: &str, date: DateTime<Utc>) -> Trade {
    Trade::from_draft(
        TradeDraft {
            id: Some(id.into()),
            symbol: "EURUSD".into(),
            direction: Direction::Short,
            date: Some(date),
            entry_price: dec!(1.0850),
            ..Default::default()
        },
        date,
    )
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[test]
fn test_empty_collection() {
    let s = summarize(&[]);
    assert_eq!(s.win_rate, Decimal::ZERO);
    assert_eq!(s.profit_factor, ProfitFactor::Ratio(Decimal::ZERO));
    assert_eq!(s.expectancy, Decimal::ZERO);
    assert_eq!(s.best_trade, None);
    assert_eq!(s.worst_trade, None);
}

#[test]
fn test_only_open_trades_behaves_like_empty() {
    let s = summarize(&[open("o1", at(10, 9)), open("o2", at(11, 9))]);
    assert_eq!(s.total_trades, 2);
    assert_eq!(s.open_trades, 2);
    assert_eq!(s.closed_trades, 0);
    assert_eq!(s.win_rate, Decimal::ZERO);
    assert_eq!(s.best_trade, None);
}

#[test]
fn test_mixed_journal_summary() {
    let trades = vec![
        closed_with_pnl("w1", at(10, 9), dec!(30)),
        closed_with_pnl("l1", at(10, 10), dec!(-10)),
        closed_with_pnl("w2", at(11, 9), dec!(10)),
        closed_with_pnl("be", at(11, 10), Decimal::ZERO),
        open("o1", at(12, 9)),
    ];
    let s = summarize(&trades);
    assert_eq!(s.closed_trades, 4);
    assert_eq!(s.open_trades, 1);
    assert_eq!(s.wins, 2);
    assert_eq!(s.losses, 1);
    assert_eq!(s.break_evens, 1);
    assert_eq!(s.total_pnl, dec!(30));
    assert_eq!(s.win_rate, dec!(50));
    assert_eq!(s.average_win, dec!(20));
    assert_eq!(s.average_loss, dec!(10));
    assert_eq!(s.profit_factor, ProfitFactor::Ratio(dec!(2)));
    assert_eq!(s.expectancy, dec!(7.5));
    assert_eq!(s.best_trade.map(|t| t.id), Some("w1".to_string()));
    assert_eq!(s.worst_trade.map(|t| t.id), Some("l1".to_string()));
    // 30, 20, 30, 30
    assert_eq!(s.max_drawdown, dec!(10));
}

#[test]
fn test_best_trade_tie_keeps_first() {
    let trades = vec![
        closed_with_pnl("first", at(10, 9), dec!(15)),
        closed_with_pnl("second", at(10, 10), dec!(15)),
        closed_with_pnl("loser", at(10, 11), dec!(-5)),
        closed_with_pnl("loser2", at(10, 12), dec!(-5)),
    ];
    let s = summarize(&trades);
    assert_eq!(s.best_trade.map(|t| t.id), Some("first".to_string()));
    assert_eq!(s.worst_trade.map(|t| t.id), Some("loser".to_string()));
}

#[test]
fn test_no_losers_is_unbounded() {
    let trades = vec![closed_with_pnl("w", at(10, 9), dec!(5))];
    assert_eq!(summarize(&trades).profit_factor, ProfitFactor::Unbounded);
}

#[test]
fn test_no_winners_is_zero() {
    let trades = vec![closed_with_pnl("l", at(10, 9), dec!(-5))];
    assert_eq!(
        summarize(&trades).profit_factor,
        ProfitFactor::Ratio(Decimal::ZERO)
    );
}

// ---------------------------------------------------------------------------
// Equity curve
// ---------------------------------------------------------------------------

#[test]
fn test_equity_curve_scenario() {
    let trades = vec![
        closed_with_pnl("a", at(10, 9), dec!(10)),
        closed_with_pnl("b", at(11, 9), dec!(-5)),
        closed_with_pnl("c", at(12, 9), dec!(20)),
    ];
    let series: Vec<Decimal> = equity_curve(&trades, None).iter().map(|p| p.balance).collect();
    assert_eq!(series, vec![dec!(10), dec!(5), dec!(25)]);
}

#[test]
fn test_equity_curve_idempotent_on_unsorted_input() {
    let trades = vec![
        closed_with_pnl("late", at(12, 9), dec!(3)),
        open("o", at(9, 9)),
        closed_with_pnl("tie-a", at(10, 9), dec!(1)),
        closed_with_pnl("early", at(9, 9), dec!(-2)),
        closed_with_pnl("tie-b", at(10, 9), dec!(4)),
    ];
    let first = equity_curve(&trades, None);
    let second = equity_curve(&trades, None);
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
    let ids: Vec<&str> = first.iter().map(|p| p.trade_id.as_str()).collect();
    assert_eq!(ids, vec!["early", "tie-a", "tie-b", "late"]);
}

// ---------------------------------------------------------------------------
// Dashboard entry point
// ---------------------------------------------------------------------------

#[test]
fn test_analyze_journal_bundles_everything() {
    let trades = vec![
        closed_with_pnl("a", at(10, 9), dec!(10)),
        closed_with_pnl("b", at(11, 9), dec!(-5)),
    ];
    let out = analyze_journal(&JournalAnalyticsInput {
        trades,
        starting_balance: Some(dec!(1000)),
    })
    .unwrap();
    let r = &out.result;
    assert_eq!(r.summary.closed_trades, 2);
    assert_eq!(r.by_weekday.len(), 7);
    assert_eq!(r.by_strategy.len(), 1);
    assert_eq!(r.by_strategy[0].label, "other");
    assert_eq!(r.equity_curve.last().map(|p| p.balance), Some(dec!(1005)));
    assert_eq!(r.balance_drawdown, dec!(5));
    assert!(r.readiness_points.is_empty());
    assert!(out.warnings.is_empty());
}

#[test]
fn test_analytics_output_serializes_unbounded_factor() {
    let out = analyze_journal(&JournalAnalyticsInput {
        trades: vec![closed_with_pnl("a", at(10, 9), dec!(10))],
        starting_balance: None,
    })
    .unwrap();
    let json = serde_json::to_value(&out.result).unwrap();
    assert_eq!(json["summary"]["profit_factor"], "Infinity");
}

#[test]
fn test_tampered_metrics_are_recomputed_from_prices() {
    use trade_journal_core::journal::TradeFilter;
    use trade_journal_core::Outcome;

    let trade = closed_with_pnl("a", at(10, 9), dec!(4));
    let mut value = serde_json::to_value(vec![trade]).unwrap();
    value[0]["metrics"]["pnl"] = serde_json::json!("-999");
    value[0]["metrics"]["outcome"] = serde_json::json!("win");

    let input: JournalAnalyticsInput =
        serde_json::from_value(serde_json::json!({ "trades": value })).unwrap();
    let out = analyze_journal(&input).unwrap();
    assert_eq!(out.result.summary.total_pnl, dec!(4));
    assert_eq!(out.result.summary.wins, 1);
    assert_eq!(out.result.summary.losses, 0);

    let win = TradeFilter {
        outcome: Some(Outcome::Win),
        ..Default::default()
    };
    assert!(win.matches(&input.trades[0]));
}
