use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

use crate::error::JournalError;
use crate::types::*;
use crate::JournalResult;

const MAX_FEAR_LEN: usize = 120;

/// Pre-trade self-assessment. Ratings are 1-5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychAssessment {
    pub confidence: u8,
    pub calm: u8,
    pub clarity: u8,
    pub energy: u8,
    pub urgency: u8,
    #[serde(default)]
    pub mindset: BTreeSet<String>,
    /// What the trader fears would happen if the trade were skipped
    #[serde(default)]
    pub fear: String,
    #[serde(default = "default_rules_followed")]
    pub rules_followed: bool,
}

fn default_rules_followed() -> bool {
    true
}

impl Default for PsychAssessment {
    fn default() -> Self {
        Self {
            confidence: 3,
            calm: 3,
            clarity: 3,
            energy: 3,
            urgency: 3,
            mindset: BTreeSet::new(),
            fear: String::new(),
            rules_followed: true,
        }
    }
}

impl PsychAssessment {
    pub fn validate(&self) -> JournalResult<()> {
        for (field, value) in [
            ("confidence", self.confidence),
            ("calm", self.calm),
            ("clarity", self.clarity),
            ("energy", self.energy),
            ("urgency", self.urgency),
        ] {
            if !(1..=5).contains(&value) {
                return Err(JournalError::invalid(field, "Rating must be between 1 and 5"));
            }
        }
        if self.fear.chars().count() > MAX_FEAR_LEN {
            return Err(JournalError::invalid(
                "fear",
                format!("Fear statement is limited to {MAX_FEAR_LEN} characters"),
            ));
        }
        Ok(())
    }
}

/// Display tier for a readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    Normal,
    Caution,
    HighRisk,
}

impl ReadinessTier {
    pub fn from_score(score: Decimal) -> Self {
        if score > dec!(60) {
            ReadinessTier::HighRisk
        } else if score > dec!(30) {
            ReadinessTier::Caution
        } else {
            ReadinessTier::Normal
        }
    }
}

/// Emotional Readiness Score with the presence flag kept alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub score: Decimal,
    /// False when no assessment was recorded; `score` is then zero
    pub assessed: bool,
    pub tier: ReadinessTier,
}

/// Emotional Readiness Score. Higher means more compromised.
///
/// ers = urgency*2 + (5 - calm)*2 + (5 - clarity)*1.5 + (energy > 3 ? 1 : 0)
pub fn ers(urgency: u8, calm: u8, clarity: u8, energy: u8) -> Decimal {
    let five = dec!(5);
    let energy_bump = if energy > 3 { Decimal::ONE } else { Decimal::ZERO };
    Decimal::from(urgency) * dec!(2)
        + (five - Decimal::from(calm)) * dec!(2)
        + (five - Decimal::from(clarity)) * dec!(1.5)
        + energy_bump
}

/// Score an optional assessment. A missing assessment scores zero with
/// `assessed = false`.
pub fn score_readiness(assessment: Option<&PsychAssessment>) -> ReadinessScore {
    match assessment {
        Some(a) => {
            let score = ers(a.urgency, a.calm, a.clarity, a.energy);
            ReadinessScore {
                score,
                assessed: true,
                tier: ReadinessTier::from_score(score),
            }
        }
        None => ReadinessScore {
            score: Decimal::ZERO,
            assessed: false,
            tier: ReadinessTier::Normal,
        },
    }
}

/// Validated readiness scoring, wrapped with metadata.
pub fn analyze_readiness(assessment: &PsychAssessment) -> JournalResult<ComputationOutput<ReadinessScore>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    assessment.validate()?;
    let output = score_readiness(Some(assessment));

    if !assessment.rules_followed {
        warnings.push("Trading rules were not followed before entry".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Emotional Readiness Score",
        &serde_json::json!({
            "formula": "urgency*2 + (5-calm)*2 + (5-clarity)*1.5 + (energy>3 ? 1 : 0)",
            "tiers": "> 60 high_risk, > 30 caution, else normal",
        }),
        warnings,
        elapsed,
        output,
    ))
}
