use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::summary::ratio;
use crate::psychology::ers;
use crate::trade::Trade;
use crate::types::*;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Count, win rate and summed P&L for one group of closed trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub label: String,
    pub count: u32,
    pub wins: u32,
    /// wins / count * 100
    pub win_rate: Rate,
    pub pnl: Money,
}

impl GroupStats {
    fn new(label: impl Into<String>) -> Self {
        GroupStats {
            label: label.into(),
            count: 0,
            wins: 0,
            win_rate: Decimal::ZERO,
            pnl: Decimal::ZERO,
        }
    }

    fn add(&mut self, trade: &Trade) {
        let pnl = trade.pnl().unwrap_or_default();
        self.count += 1;
        if pnl > Decimal::ZERO {
            self.wins += 1;
        }
        self.pnl += pnl;
    }

    fn finish(mut self) -> Self {
        self.win_rate = ratio(Decimal::from(self.wins), Decimal::from(self.count)) * dec!(100);
        self
    }
}

/// Closed-trade totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub count: u32,
    pub wins: u32,
    pub pnl: Money,
}

/// One point on the readiness-vs-outcome scatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessPoint {
    pub trade_id: String,
    pub ers: Decimal,
    pub pnl: Money,
}

/// Per-weekday stats, always Monday through Sunday.
///
/// Trades are attributed to the day they were closed, or the day they were
/// opened when no exit date was recorded.
pub fn by_weekday(trades: &[Trade]) -> Vec<GroupStats> {
    let mut groups: Vec<GroupStats> = WEEKDAYS.iter().map(|d| GroupStats::new(d.to_string())).collect();
    for t in closed(trades) {
        let idx = t.settled_date().weekday().num_days_from_monday() as usize;
        groups[idx].add(t);
    }
    groups.into_iter().map(GroupStats::finish).collect()
}

/// Daily P&L keyed on the settlement date, oldest first.
///
/// `recent` keeps only the latest N days that had a closed trade.
pub fn by_day(trades: &[Trade], recent: Option<usize>) -> Vec<DayStats> {
    let mut days: BTreeMap<NaiveDate, DayStats> = BTreeMap::new();
    for t in closed(trades) {
        let date = t.settled_date().date_naive();
        let day = days.entry(date).or_insert(DayStats {
            date,
            count: 0,
            wins: 0,
            pnl: Decimal::ZERO,
        });
        let pnl = t.pnl().unwrap_or_default();
        day.count += 1;
        if pnl > Decimal::ZERO {
            day.wins += 1;
        }
        day.pnl += pnl;
    }
    let days: Vec<DayStats> = days.into_values().collect();
    match recent {
        Some(n) if days.len() > n => days[days.len() - n..].to_vec(),
        _ => days,
    }
}

/// Per-emotion stats keyed on the pre-trade emotion, in first-seen order.
/// Trades with no recorded emotion are skipped.
pub fn by_emotion(trades: &[Trade]) -> Vec<GroupStats> {
    group_by(
        closed(trades).filter(|t| !t.pre_emotion.trim().is_empty()),
        |t| t.pre_emotion.trim().to_string(),
    )
}

/// Per-strategy stats in first-seen order; untagged trades fall under `other`.
pub fn by_strategy(trades: &[Trade]) -> Vec<GroupStats> {
    group_by(closed(trades), |t| {
        let s = t.strategy.trim();
        if s.is_empty() {
            "other".to_string()
        } else {
            s.to_string()
        }
    })
}

/// (ERS, pnl) for every closed trade that carries a pre-trade assessment.
pub fn readiness_points(trades: &[Trade]) -> Vec<ReadinessPoint> {
    closed(trades)
        .filter_map(|t| {
            t.psych.as_ref().map(|p| ReadinessPoint {
                trade_id: t.id.clone(),
                ers: ers(p.urgency, p.calm, p.clarity, p.energy),
                pnl: t.pnl().unwrap_or_default(),
            })
        })
        .collect()
}

pub(super) fn closed(trades: &[Trade]) -> impl Iterator<Item = &Trade> {
    trades.iter().filter(|t| t.is_closed())
}

fn group_by<'a>(
    trades: impl Iterator<Item = &'a Trade>,
    key: impl Fn(&Trade) -> String,
) -> Vec<GroupStats> {
    let mut groups: Vec<GroupStats> = Vec::new();
    for t in trades {
        let label = key(t);
        match groups.iter_mut().find(|g| g.label == label) {
            Some(g) => g.add(t),
            None => {
                let mut g = GroupStats::new(label);
                g.add(t);
                groups.push(g);
            }
        }
    }
    groups.into_iter().map(GroupStats::finish).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psychology::PsychAssessment;
    use crate::trade::TradeDraft;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn closed_trade(day: u32, exit: Decimal, strategy: &str, emotion: &str) -> Trade {
        let date = Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap();
        Trade::from_draft(
            TradeDraft {
                symbol: "AAPL".into(),
                date: Some(date),
                entry_price: dec!(100),
                exit_price: Some(exit),
                strategy: strategy.into(),
                pre_emotion: emotion.into(),
                ..Default::default()
            },
            date,
        )
    }

    #[test]
    fn test_weekday_always_seven_groups() {
        // 2025-03-10 is a Monday, 2025-03-12 a Wednesday
        let trades = vec![
            closed_trade(10, dec!(110), "", ""),
            closed_trade(10, dec!(95), "", ""),
            closed_trade(12, dec!(104), "", ""),
        ];
        let days = by_weekday(&trades);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].label, "Mon");
        assert_eq!(days[0].count, 2);
        assert_eq!(days[0].wins, 1);
        assert_eq!(days[0].win_rate, dec!(50));
        assert_eq!(days[0].pnl, dec!(5));
        assert_eq!(days[2].label, "Wed");
        assert_eq!(days[2].pnl, dec!(4));
        assert_eq!(days[6].label, "Sun");
        assert_eq!(days[6].count, 0);
        assert_eq!(days[6].win_rate, Decimal::ZERO);
    }

    #[test]
    fn test_by_day_sums_and_orders() {
        let mut late = closed_trade(10, dec!(90), "", "");
        late.exit_date = Some(Utc.with_ymd_and_hms(2025, 3, 12, 15, 0, 0).unwrap());
        let trades = vec![
            closed_trade(11, dec!(110), "", ""),
            late,
            closed_trade(10, dec!(103), "", ""),
            closed_trade(11, dec!(98), "", ""),
        ];
        let days = by_day(&trades, None);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(days[0].pnl, dec!(3));
        assert_eq!(days[1].count, 2);
        assert_eq!(days[1].wins, 1);
        assert_eq!(days[1].pnl, dec!(8));
        assert_eq!(days[2].date, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
        assert_eq!(days[2].pnl, dec!(-10));

        let recent = by_day(&trades, Some(2));
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
    }

    #[test]
    fn test_emotion_skips_blank_and_keeps_order() {
        let trades = vec![
            closed_trade(10, dec!(110), "", "fomo"),
            closed_trade(11, dec!(100), "", ""),
            closed_trade(11, dec!(100), "", "calm"),
            closed_trade(12, dec!(90), "", "fomo"),
        ];
        let groups = by_emotion(&trades);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "fomo");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].pnl, Decimal::ZERO);
        // break-even is not a win
        assert_eq!(groups[1].label, "calm");
        assert_eq!(groups[1].wins, 0);
        assert_eq!(groups[1].win_rate, Decimal::ZERO);
    }

    #[test]
    fn test_strategy_defaults_to_other() {
        let trades = vec![
            closed_trade(10, dec!(110), "breakout", ""),
            closed_trade(11, dec!(90), "  ", ""),
        ];
        let groups = by_strategy(&trades);
        assert_eq!(groups[0].label, "breakout");
        assert_eq!(groups[1].label, "other");
        assert_eq!(groups[1].pnl, dec!(-10));
    }

    #[test]
    fn test_readiness_points_only_assessed() {
        let mut assessed = closed_trade(10, dec!(110), "", "");
        assessed.psych = Some(PsychAssessment {
            urgency: 5,
            calm: 1,
            clarity: 1,
            energy: 5,
            ..Default::default()
        });
        let trades = vec![assessed, closed_trade(11, dec!(90), "", "")];
        let points = readiness_points(&trades);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].ers, dec!(25));
        assert_eq!(points[0].pnl, dec!(10));
    }
}
