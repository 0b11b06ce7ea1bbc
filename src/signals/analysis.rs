// =============================================================================
// Market Analysis — fan-out over every classifier for one series
// =============================================================================
//
// Runs structure, liquidity, volatility, zone and level classification on the
// same bar slice, scores the confluence, and assembles the trade-idea card:
//
//   BULLISH bias → BUY,  BEARISH bias → SELL,  RANGE → no signal

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engines::{
    analyze_volatility, classify_structure, find_levels, find_pools, find_sweep, find_zones,
    KeyLevel, LiquidityPool, StructureState, Sweep, TrendCondition, Zone,
};
use crate::market_data::Bar;
use crate::signals::confluence::{score_with_breakdown, ConfluenceResult};
use crate::types::Bias;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalSide {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A directional trade idea derived from one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub side: SignalSide,
    pub confidence: u8,
    pub entry: f64,
    pub reason: String,
}

/// Every classifier output for one `(pair, timeframe)` series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub pair: String,
    pub timeframe: String,
    pub bars: usize,
    pub last_close: Option<f64>,
    pub structure: StructureState,
    pub trend: TrendCondition,
    pub sweep: Option<Sweep>,
    pub pools: Vec<LiquidityPool>,
    pub zones: Vec<Zone>,
    pub levels: Vec<KeyLevel>,
    pub confluence: ConfluenceResult,
    pub signal: Option<TradeSignal>,
}

impl MarketAnalysis {
    pub fn score(&self) -> u8 {
        self.confluence.score
    }
}

pub fn analyze(pair: &str, timeframe: &str, bars: &[Bar]) -> MarketAnalysis {
    let structure = classify_structure(bars);
    let trend = analyze_volatility(bars);
    let sweep = find_sweep(bars);
    let confluence = score_with_breakdown(structure.bias, sweep.is_some(), trend.volatility);
    let last_close = bars.last().map(|b| b.close);

    let side = match structure.bias {
        Bias::Bullish => Some(SignalSide::Buy),
        Bias::Bearish => Some(SignalSide::Sell),
        Bias::Range => None,
    };
    let signal = side.zip(last_close).map(|(side, entry)| TradeSignal {
        side,
        confidence: confluence.score,
        entry,
        reason: format!(
            "{} {} | trend {} | volatility {} | sweep {}",
            structure.bias,
            structure.event,
            trend.strength,
            trend.volatility,
            sweep.map_or_else(|| "none".to_string(), |s| s.side.to_string()),
        ),
    });

    debug!(
        pair,
        timeframe,
        bias = %structure.bias,
        event = %structure.event,
        volatility = %trend.volatility,
        score = confluence.score,
        "market analysed"
    );

    MarketAnalysis {
        pair: pair.to_string(),
        timeframe: timeframe.to_string(),
        bars: bars.len(),
        last_close,
        structure,
        trend,
        sweep,
        pools: find_pools(bars),
        zones: find_zones(bars),
        levels: find_levels(bars),
        confluence,
        signal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructureEvent;

    fn rising(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 1.0 + i as f64 * 0.002;
                Bar::new(i as i64, c - 0.001, c + 0.0005, c - 0.0015, c)
            })
            .collect()
    }

    #[test]
    fn empty_series_is_neutral() {
        let a = analyze("EURUSD", "H1", &[]);
        assert_eq!(a.structure.event, StructureEvent::None);
        assert!(a.signal.is_none());
        assert!(a.zones.is_empty());
        assert!(a.levels.is_empty());
        // Base 40 + NORMAL volatility 20.
        assert_eq!(a.score(), 60);
    }

    #[test]
    fn rising_series_yields_buy_signal() {
        let a = analyze("EURUSD", "H1", &rising(30));
        assert_eq!(a.structure.bias, Bias::Bullish);
        let signal = a.signal.clone().unwrap();
        assert_eq!(signal.side, SignalSide::Buy);
        assert_eq!(signal.confidence, a.score());
        assert!(a.score() >= 60);
    }

    #[test]
    fn analysis_is_deterministic() {
        let bars = rising(80);
        assert_eq!(analyze("X", "M5", &bars), analyze("X", "M5", &bars));
    }
}
