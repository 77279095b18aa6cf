use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::breakdown::closed;
use crate::trade::Trade;

/// Entry emotions counted as emotionally driven trading.
const EMOTIONAL_ENTRIES: [&str; 3] = ["fomo", "revenge", "greedy"];

/// Prefix of the reflection alignments that record a broken plan.
const RULES_BROKEN: &str = "rules broken";

/// An entry emotion paired with how the trade ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionPattern {
    pub emotion: String,
    /// Break-even counts as not won
    pub won: bool,
    pub count: u32,
}

/// Psychology tracker summary over closed trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychInsights {
    /// Most frequent emotion/result pair; the first one seen wins a tie
    pub top_pattern: Option<EmotionPattern>,
    /// Trades entered on fomo, revenge or greed
    pub emotional_trades: u32,
    /// Trades where the plan was not followed, per the pre-trade
    /// assessment or the post-trade reflection
    pub rules_broken: u32,
}

pub fn psych_insights(trades: &[Trade]) -> PsychInsights {
    let mut patterns: Vec<EmotionPattern> = Vec::new();
    let mut emotional_trades = 0;
    let mut rules_broken = 0;

    for t in closed(trades) {
        let emotion = t.pre_emotion.trim().to_lowercase();
        if !emotion.is_empty() {
            let won = t.pnl().unwrap_or_default() > Decimal::ZERO;
            match patterns
                .iter_mut()
                .find(|p| p.emotion == emotion && p.won == won)
            {
                Some(p) => p.count += 1,
                None => patterns.push(EmotionPattern {
                    emotion: emotion.clone(),
                    won,
                    count: 1,
                }),
            }
            if EMOTIONAL_ENTRIES.contains(&emotion.as_str()) {
                emotional_trades += 1;
            }
        }
        if broke_rules(t) {
            rules_broken += 1;
        }
    }

    let mut top_pattern: Option<EmotionPattern> = None;
    for p in patterns {
        if top_pattern.as_ref().map_or(true, |top| p.count > top.count) {
            top_pattern = Some(p);
        }
    }

    PsychInsights {
        top_pattern,
        emotional_trades,
        rules_broken,
    }
}

fn broke_rules(t: &Trade) -> bool {
    let assessed = t.psych.as_ref().is_some_and(|p| !p.rules_followed);
    let reflected = t
        .reflection
        .as_ref()
        .is_some_and(|r| r.alignment.trim().to_lowercase().starts_with(RULES_BROKEN));
    assessed || reflected
}
