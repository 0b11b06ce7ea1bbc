// =============================================================================
// Signals Module
// =============================================================================
//
// Trade-signal path of the pipeline:
// - Confluence scoring (additive point rules, clamped to 0–100)
// - Market analysis (classifier fan-out + trade-idea assembly)

pub mod analysis;
pub mod confluence;

pub use analysis::{analyze, MarketAnalysis, SignalSide, TradeSignal};
pub use confluence::{calculate_score, score_with_breakdown, ConfluenceResult, ScoreContribution};
