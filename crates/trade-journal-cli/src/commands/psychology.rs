use clap::Args;
use serde_json::Value;

use trade_journal_core::psychology::readiness::analyze_readiness;
use trade_journal_core::psychology::PsychAssessment;

use super::read_input;

/// Arguments for the emotional readiness score
#[derive(Args)]
pub struct ReadinessArgs {
    /// Path to JSON assessment file
    #[arg(long, conflicts_with = "PsychFlags")]
    pub input: Option<String>,

    #[command(flatten)]
    pub ratings: PsychFlags,
}

/// Pre-trade assessment flags. Unset ratings default to 3.
#[derive(Args)]
pub struct PsychFlags {
    #[arg(long)]
    pub confidence: Option<u8>,

    #[arg(long)]
    pub calm: Option<u8>,

    #[arg(long)]
    pub clarity: Option<u8>,

    #[arg(long)]
    pub energy: Option<u8>,

    #[arg(long)]
    pub urgency: Option<u8>,

    /// Comma-separated mindset tags
    #[arg(long, value_delimiter = ',')]
    pub mindset: Vec<String>,

    /// Fear statement (max 120 characters)
    #[arg(long)]
    pub fear: Option<String>,

    /// Trading plan rules were broken
    #[arg(long)]
    pub rules_broken: bool,
}

impl PsychFlags {
    pub fn has_ratings(&self) -> bool {
        self.confidence.is_some()
            || self.calm.is_some()
            || self.clarity.is_some()
            || self.energy.is_some()
            || self.urgency.is_some()
    }

    pub fn into_assessment(self) -> PsychAssessment {
        let d = PsychAssessment::default();
        PsychAssessment {
            confidence: self.confidence.unwrap_or(d.confidence),
            calm: self.calm.unwrap_or(d.calm),
            clarity: self.clarity.unwrap_or(d.clarity),
            energy: self.energy.unwrap_or(d.energy),
            urgency: self.urgency.unwrap_or(d.urgency),
            mindset: self.mindset.into_iter().map(|s| s.trim().to_string()).collect(),
            fear: self.fear.unwrap_or_default(),
            rules_followed: !self.rules_broken,
        }
    }

    /// Assessment only when at least one rating was given.
    pub fn into_optional(self) -> Option<PsychAssessment> {
        if self.has_ratings() {
            Some(self.into_assessment())
        } else {
            None
        }
    }
}

pub fn run_readiness(args: ReadinessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assessment = if args.input.is_none() && args.ratings.has_ratings() {
        args.ratings.into_assessment()
    } else {
        read_input::<PsychAssessment>(args.input.as_deref())?.ok_or(
            "ratings (--urgency, --calm, --clarity, --energy, --confidence) or --input required",
        )?
    };
    let result = analyze_readiness(&assessment)?;
    Ok(serde_json::to_value(result)?)
}
