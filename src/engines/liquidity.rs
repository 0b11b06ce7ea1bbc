// =============================================================================
// Liquidity Classifier — sweeps and equal-high/low pools
// =============================================================================
//
// Sweep: a wick beyond the prior N-bar extreme whose confirming close lands
// back strictly inside that range. Candidates are the last bar and the bar
// before it. For the last bar, the wick and the confirming close belong to
// the same bar; this same-bar reading is intentional, so a pin bar that
// rejects the extreme on its own close counts without waiting a bar. The
// most recent candidate wins; buy-side is checked before sell-side.
//
//   inside          : min(low[i-N..i]) < close_last < max(high[i-N..i])
//   buy-side sweep  : high_i > max(high[i-N..i])  AND  inside
//   sell-side sweep : low_i  < min(low[i-N..i])   AND  inside
//
// An outside bar that closes beyond either extreme is a breakout, not a
// sweep.
//
// Pools: swing highs / swing lows over the trailing 20 bars, clustered when
// they sit within POOL_TOLERANCE of the cluster's first price. A cluster of
// two or more touches is a pool.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::{trailing, Bar};
use crate::types::LiquiditySide;

/// Prior-range lookback for sweep detection.
pub const SWEEP_LOOKBACK: usize = 10;

/// Trailing window scanned for pools.
pub const POOL_WINDOW: usize = 20;

/// Relative distance within which two extremes count as "equal".
pub const POOL_TOLERANCE: f64 = 0.001;

/// A detected liquidity sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub side: LiquiditySide,
    /// The prior extreme that was taken out.
    pub level: f64,
    /// Index of the sweeping bar in the supplied slice.
    pub bar_index: usize,
}

/// A cluster of equal highs or equal lows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPool {
    pub side: LiquiditySide,
    pub price: f64,
    pub touches: usize,
}

/// Locate the most recent sweep, if any.
pub fn find_sweep(bars: &[Bar]) -> Option<Sweep> {
    let n = bars.len();
    if n < SWEEP_LOOKBACK + 1 {
        return None;
    }
    let confirm_close = bars[n - 1].close;

    // Most recent candidate first.
    for i in (n.saturating_sub(2)..n).rev() {
        if i < SWEEP_LOOKBACK {
            continue;
        }
        let prior = &bars[i - SWEEP_LOOKBACK..i];
        let prior_high = prior.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let prior_low = prior.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let bar = &bars[i];
        if !(confirm_close > prior_low && confirm_close < prior_high) {
            continue;
        }

        if bar.high > prior_high {
            debug!(index = i, level = prior_high, "buy-side sweep");
            return Some(Sweep {
                side: LiquiditySide::BuySide,
                level: prior_high,
                bar_index: i,
            });
        }
        if bar.low < prior_low {
            debug!(index = i, level = prior_low, "sell-side sweep");
            return Some(Sweep {
                side: LiquiditySide::SellSide,
                level: prior_low,
                bar_index: i,
            });
        }
    }
    None
}

pub fn detect_sweep(bars: &[Bar]) -> bool {
    find_sweep(bars).is_some()
}

/// Equal-high (buy-side) and equal-low (sell-side) pools over the trailing
/// window. Buy-side pools come first, each side ascending by price.
pub fn find_pools(bars: &[Bar]) -> Vec<LiquidityPool> {
    let window = trailing(bars, POOL_WINDOW);
    if window.len() < 3 {
        return Vec::new();
    }

    let mut swing_highs = Vec::new();
    let mut swing_lows = Vec::new();
    for i in 1..window.len() - 1 {
        let (prev, cur, next) = (&window[i - 1], &window[i], &window[i + 1]);
        if cur.high >= prev.high && cur.high >= next.high {
            swing_highs.push(cur.high);
        }
        if cur.low <= prev.low && cur.low <= next.low {
            swing_lows.push(cur.low);
        }
    }

    let mut pools = cluster(swing_highs, LiquiditySide::BuySide);
    pools.extend(cluster(swing_lows, LiquiditySide::SellSide));
    pools
}

/// Pool prices only, in the order `find_pools` returns them.
pub fn pool_prices(bars: &[Bar]) -> Vec<f64> {
    find_pools(bars).into_iter().map(|p| p.price).collect()
}

fn cluster(mut prices: Vec<f64>, side: LiquiditySide) -> Vec<LiquidityPool> {
    prices.sort_by(f64::total_cmp);

    let mut pools = Vec::new();
    let mut members: Vec<f64> = Vec::new();

    let mut flush = |members: &mut Vec<f64>| {
        if members.len() >= 2 {
            let price = members.iter().sum::<f64>() / members.len() as f64;
            pools.push(LiquidityPool {
                side,
                price,
                touches: members.len(),
            });
        }
        members.clear();
    };

    for price in prices {
        match members.first().copied() {
            Some(anchor) if (price - anchor).abs() <= anchor.abs() * POOL_TOLERANCE => {
                members.push(price);
            }
            Some(_) => {
                flush(&mut members);
                members.push(price);
            }
            None => members.push(price),
        }
    }
    flush(&mut members);
    pools
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Ten quiet bars oscillating inside [0.99, 1.01].
    fn quiet_range() -> Vec<Bar> {
        (0..10)
            .map(|i| Bar::new(i, 1.0, 1.01, 0.99, 1.0))
            .collect()
    }

    #[test]
    fn too_few_bars_never_sweep() {
        let bars = quiet_range();
        assert!(!detect_sweep(&bars));
    }

    #[test]
    fn wick_above_then_close_inside_is_buy_side_sweep() {
        let mut bars = quiet_range();
        bars.push(Bar::new(10, 1.0, 1.03, 0.995, 1.005));
        let sweep = find_sweep(&bars).unwrap();
        assert_eq!(sweep.side, LiquiditySide::BuySide);
        assert_eq!(sweep.bar_index, 10);
        assert!((sweep.level - 1.01).abs() < 1e-12);
    }

    #[test]
    fn breakout_close_is_not_a_sweep() {
        let mut bars = quiet_range();
        bars.push(Bar::new(10, 1.0, 1.03, 0.995, 1.025));
        assert!(!detect_sweep(&bars));
    }

    #[test]
    fn outside_bar_closing_below_range_is_not_a_sweep() {
        let mut bars = quiet_range();
        // Wicks through both extremes, closes below the prior low.
        bars.push(Bar::new(10, 1.0, 1.03, 0.95, 0.96));
        assert_eq!(find_sweep(&bars), None);

        let mut bars = quiet_range();
        // Mirror case: closes above the prior high.
        bars.push(Bar::new(10, 1.0, 1.05, 0.97, 1.04));
        assert_eq!(find_sweep(&bars), None);
    }

    #[test]
    fn next_bar_close_confirms_prior_wick() {
        let mut bars = quiet_range();
        // Bar 10 wicks below and closes below the prior low...
        bars.push(Bar::new(10, 0.995, 0.996, 0.97, 0.98));
        // ...bar 11 closes back inside.
        bars.push(Bar::new(11, 0.98, 1.0, 0.975, 0.995));
        let sweep = find_sweep(&bars).unwrap();
        assert_eq!(sweep.side, LiquiditySide::SellSide);
        assert_eq!(sweep.bar_index, 10);
    }

    #[test]
    fn equal_highs_form_one_pool() {
        let highs = [1.00, 1.05, 1.00, 1.0502, 1.00, 1.0498, 1.00];
        let bars: Vec<Bar> = highs
            .iter()
            .enumerate()
            .map(|(i, &h)| Bar::new(i as i64, 0.99, h, 0.98 + i as f64 * 0.001, 0.99))
            .collect();
        let pools: Vec<LiquidityPool> = find_pools(&bars)
            .into_iter()
            .filter(|p| p.side == LiquiditySide::BuySide)
            .collect();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].touches, 3);
        assert!((pools[0].price - 1.05).abs() < 1e-3);
    }

    #[test]
    fn distinct_highs_make_no_pool() {
        let highs = [1.00, 1.10, 1.00, 1.20, 1.00, 1.30, 1.00];
        let bars: Vec<Bar> = highs
            .iter()
            .enumerate()
            .map(|(i, &h)| Bar::new(i as i64, 0.99, h, 0.98 - i as f64 * 0.01, 0.99))
            .collect();
        assert!(find_pools(&bars)
            .iter()
            .all(|p| p.side != LiquiditySide::BuySide));
    }

    #[test]
    fn pool_prices_match_pools() {
        let bars = quiet_range();
        let prices = pool_prices(&bars);
        let pools = find_pools(&bars);
        assert_eq!(prices.len(), pools.len());
        assert!(!pools.is_empty());
    }
}
