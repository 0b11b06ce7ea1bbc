// =============================================================================
// Vigil Engine — deterministic technical scoring and alert vigilance
// =============================================================================
//
// Classifiers (`engines`) read a chronological bar slice and return labels.
// The trade-signal path (`signals`) combines them into a confluence score.
// The alert path (`vigilance`) scores smart/simple alerts and gates them
// through a cooldown.

pub mod app_state;
pub mod clock;
pub mod engines;
pub mod market_data;
pub mod runtime_config;
pub mod signals;
pub mod types;
pub mod vigilance;

pub use app_state::{EngineSnapshot, EngineState, PairEvaluation};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engines::{
    analyze_volatility, classify_structure, detect_sweep, find_levels, find_pools, find_sweep,
    find_zones, pool_prices, KeyLevel, LiquidityPool, StructureState, Sweep, TrendCondition, Zone,
};
pub use market_data::{Bar, BarBuffer, BarKey, PriceSeries};
pub use runtime_config::RuntimeConfig;
pub use signals::{analyze, calculate_score, MarketAnalysis, SignalSide, TradeSignal};
pub use types::{
    Bias, Freshness, LevelKind, LevelStrength, LiquiditySide, StructureEvent, TrendStrength,
    VolatilityLabel, ZoneKind,
};
pub use vigilance::{
    AlertStrength, AlertType, RejectionLog, SmartAlertRequest, VigilanceNode, VigilanceRegistry,
};
