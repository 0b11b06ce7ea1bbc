// =============================================================================
// Confluence / Risk Scorer — additive point rules
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::{Bias, VolatilityLabel};

const BASE_POINTS: i32 = 40;
const STRUCTURE_POINTS: i32 = 20;
const SWEEP_POINTS: i32 = 20;
const VOLATILITY_POINTS: i32 = 20;

/// The points a single rule added to the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub name: String,
    pub points: i32,
}

/// Score plus the rules that built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfluenceResult {
    pub score: u8,
    pub contributions: Vec<ScoreContribution>,
}

/// Score and per-rule breakdown. Rules that did not fire contribute 0 and are
/// still listed so the dashboard can render every row.
pub fn score_with_breakdown(
    bias: Bias,
    has_liquidity_sweep: bool,
    volatility: VolatilityLabel,
) -> ConfluenceResult {
    let rules = [
        ("base", BASE_POINTS),
        ("structure", if bias != Bias::Range { STRUCTURE_POINTS } else { 0 }),
        ("liquidity_sweep", if has_liquidity_sweep { SWEEP_POINTS } else { 0 }),
        (
            "volatility",
            if volatility == VolatilityLabel::Normal {
                VOLATILITY_POINTS
            } else {
                0
            },
        ),
    ];

    let total: i32 = rules.iter().map(|(_, p)| p).sum();
    ConfluenceResult {
        score: total.clamp(0, 100) as u8,
        contributions: rules
            .iter()
            .map(|&(name, points)| ScoreContribution {
                name: name.to_string(),
                points,
            })
            .collect(),
    }
}

/// Confluence score in [0, 100].
pub fn calculate_score(bias: Bias, has_liquidity_sweep: bool, volatility: VolatilityLabel) -> u8 {
    score_with_breakdown(bias, has_liquidity_sweep, volatility).score
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIASES: [Bias; 3] = [Bias::Bullish, Bias::Bearish, Bias::Range];
    const VOLS: [VolatilityLabel; 3] = [
        VolatilityLabel::High,
        VolatilityLabel::Normal,
        VolatilityLabel::Low,
    ];

    #[test]
    fn every_combination_stays_in_bounds() {
        for bias in BIASES {
            for sweep in [true, false] {
                for vol in VOLS {
                    let s = calculate_score(bias, sweep, vol);
                    assert!((40..=100).contains(&s), "{bias} {sweep} {vol} → {s}");
                }
            }
        }
    }

    #[test]
    fn maximum_is_exactly_100() {
        assert_eq!(calculate_score(Bias::Bullish, true, VolatilityLabel::Normal), 100);
        assert_eq!(calculate_score(Bias::Bearish, true, VolatilityLabel::Normal), 100);
    }

    #[test]
    fn minimum_is_exactly_40() {
        assert_eq!(calculate_score(Bias::Range, false, VolatilityLabel::High), 40);
        assert_eq!(calculate_score(Bias::Range, false, VolatilityLabel::Low), 40);
    }

    #[test]
    fn breakdown_sums_to_score() {
        let r = score_with_breakdown(Bias::Range, true, VolatilityLabel::Normal);
        assert_eq!(r.score, 80);
        let sum: i32 = r.contributions.iter().map(|c| c.points).sum();
        assert_eq!(sum, 80);
        assert_eq!(r.contributions.len(), 4);
    }
}
