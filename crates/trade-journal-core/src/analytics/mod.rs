pub mod breakdown;
pub mod equity;
pub mod insights;
pub mod report;
pub mod summary;

pub use breakdown::{
    by_day, by_emotion, by_strategy, by_weekday, readiness_points, DayStats, GroupStats,
    ReadinessPoint,
};
pub use equity::{equity_curve, max_drawdown, EquityPoint};
pub use insights::{psych_insights, EmotionPattern, PsychInsights};
pub use report::{analyze_journal, JournalAnalyticsInput, JournalAnalyticsOutput};
pub use summary::{summarize, JournalSummary, ProfitFactor, TradeHighlight};
