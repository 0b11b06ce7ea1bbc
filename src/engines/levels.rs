// =============================================================================
// Support / Resistance Level Detector
// =============================================================================
//
// Histogram of every high and low in the trailing 100 bars:
//
//   bin_size = (max - min) / 50          (min = 0, max = 1 when empty)
//   bin      = floor(price / bin_size)   (absolute, not offset by min)
//   price    = bin * bin_size            (left edge of the bin)
//
// Bins are ranked by occupancy with a stable sort over first-appearance
// order, so ties always resolve the same way. The top five become levels:
// RESISTANCE above the last close, SUPPORT at or below it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::{Bar, PriceSeries};
use crate::types::{LevelKind, LevelStrength};

pub const LEVEL_WINDOW: usize = 100;
pub const LEVEL_BINS: f64 = 50.0;
pub const MAX_LEVELS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevel {
    pub kind: LevelKind,
    pub price: f64,
    pub strength: LevelStrength,
    /// Number of highs/lows that fell into the bin.
    pub touches: usize,
}

impl LevelStrength {
    fn from_touches(count: usize) -> Self {
        if count > 10 {
            Self::High
        } else if count > 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

pub fn find_levels(bars: &[Bar]) -> Vec<KeyLevel> {
    let series = PriceSeries::new(bars).window(LEVEL_WINDOW);

    let mut prices = series.highs();
    prices.extend(series.lows());

    let (min, max) = if prices.is_empty() {
        (0.0, 1.0)
    } else {
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    };
    let bin_size = (max - min) / LEVEL_BINS;

    // (bin index, count) in first-appearance order.
    let mut bins: Vec<(i64, usize)> = Vec::new();
    for &price in &prices {
        let index = if bin_size > 0.0 {
            (price / bin_size).floor() as i64
        } else {
            0
        };
        match bins.iter_mut().find(|(b, _)| *b == index) {
            Some((_, count)) => *count += 1,
            None => bins.push((index, 1)),
        }
    }

    // Stable: equal counts keep first-appearance order.
    bins.sort_by(|a, b| b.1.cmp(&a.1));

    let last_close = series.last().map_or(0.0, |b| b.close);
    let levels: Vec<KeyLevel> = bins
        .into_iter()
        .take(MAX_LEVELS)
        .map(|(index, count)| {
            let price = index as f64 * bin_size;
            KeyLevel {
                kind: if price > last_close {
                    LevelKind::Resistance
                } else {
                    LevelKind::Support
                },
                price,
                strength: LevelStrength::from_touches(count),
                touches: count,
            }
        })
        .collect();

    debug!(count = levels.len(), bin_size, last_close, "key levels found");
    levels
}
