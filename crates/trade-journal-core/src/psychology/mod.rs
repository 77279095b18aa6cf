pub mod readiness;
pub mod reflection;

pub use readiness::{ers, score_readiness, PsychAssessment, ReadinessScore, ReadinessTier};
pub use reflection::PostTradeReflection;
