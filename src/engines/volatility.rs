// =============================================================================
// Volatility / Efficiency Classifier
// =============================================================================
//
// Over the trailing 20 bars:
//
//   range_i    = high_i - low_i
//   volatility = HIGH   if last_range > 1.5 * mean(range)
//                LOW    if last_range < 0.5 * mean(range)
//                NORMAL otherwise
//   efficiency = |close_last - close_first| / sum(range)   (0 when sum == 0)
//   strength   = STRONG if efficiency > 0.3 else WEAK

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::market_data::{Bar, PriceSeries};
use crate::types::{TrendStrength, VolatilityLabel};

pub const VOLATILITY_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendCondition {
    pub strength: TrendStrength,
    pub volatility: VolatilityLabel,
    /// Net move over total range travelled, in [0, 1] for sane input.
    pub efficiency_ratio: f64,
}

impl Default for TrendCondition {
    fn default() -> Self {
        Self {
            strength: TrendStrength::Weak,
            volatility: VolatilityLabel::Normal,
            efficiency_ratio: 0.0,
        }
    }
}

pub fn analyze_volatility(bars: &[Bar]) -> TrendCondition {
    let series = PriceSeries::new(bars).window(VOLATILITY_WINDOW);
    let (Some(first), Some(last)) = (series.bars().first(), series.last()) else {
        return TrendCondition::default();
    };

    let ranges = series.ranges();
    let total_move: f64 = ranges.iter().sum();
    let avg_range = total_move / ranges.len() as f64;
    let last_range = ranges.last().copied().unwrap_or(0.0);

    let volatility = if last_range > avg_range * 1.5 {
        VolatilityLabel::High
    } else if last_range < avg_range * 0.5 {
        VolatilityLabel::Low
    } else {
        VolatilityLabel::Normal
    };

    let net_move = (last.close - first.close).abs();
    let efficiency_ratio = if total_move == 0.0 {
        0.0
    } else {
        net_move / total_move
    };

    let strength = if efficiency_ratio > 0.3 {
        TrendStrength::Strong
    } else {
        TrendStrength::Weak
    };

    trace!(
        avg_range,
        last_range,
        efficiency = format!("{:.4}", efficiency_ratio),
        "volatility analysed"
    );

    TrendCondition {
        strength,
        volatility,
        efficiency_ratio,
    }
}
