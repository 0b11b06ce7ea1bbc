// =============================================================================
// Classification Engines
// =============================================================================
//
// Pure, deterministic classifiers over a chronological bar slice. None of
// them fail: too-short or degenerate input yields a defined fallback, so a
// cold-start series degrades to neutral labels instead of errors. They hold
// no state and may be called from any thread.

pub mod levels;
pub mod liquidity;
pub mod structure;
pub mod volatility;
pub mod zones;

pub use levels::{find_levels, KeyLevel};
pub use liquidity::{detect_sweep, find_pools, find_sweep, pool_prices, LiquidityPool, Sweep};
pub use structure::{classify_structure, StructureState};
pub use volatility::{analyze_volatility, TrendCondition};
pub use zones::{find_zones, Zone};
