// =============================================================================
// Supply / Demand Zone Detector
// =============================================================================
//
// An extended-range candle (body > 2.5x the mean body of the five bars before
// it) marks the previous bar's range as a fresh zone: DEMAND when the
// extended candle closed up, SUPPLY otherwise.
//
// Scans i = 5 ..= n-2 over the trailing 60 bars. The final bar is still
// forming and is never examined. Only the last four zones are kept.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::{Bar, PriceSeries};
use crate::types::{Freshness, ZoneKind};

pub const ZONE_WINDOW: usize = 60;
pub const MAX_ZONES: usize = 4;

const BODY_LOOKBACK: usize = 5;
const EXTENDED_BODY_MULTIPLIER: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub low: f64,
    pub high: f64,
    pub freshness: Freshness,
}

pub fn find_zones(bars: &[Bar]) -> Vec<Zone> {
    let series = PriceSeries::new(bars).window(ZONE_WINDOW);
    let n = series.len();
    if n < BODY_LOOKBACK + 1 {
        return Vec::new();
    }

    let window = series.bars();
    let bodies = series.bodies();
    let mut zones = Vec::new();

    for i in BODY_LOOKBACK..n - 1 {
        let avg_body = bodies[i - BODY_LOOKBACK..i].iter().sum::<f64>() / BODY_LOOKBACK as f64;
        if bodies[i] <= avg_body * EXTENDED_BODY_MULTIPLIER {
            continue;
        }

        let kind = if window[i].close > window[i].open {
            ZoneKind::Demand
        } else {
            ZoneKind::Supply
        };
        let base = &window[i - 1];
        zones.push(Zone {
            kind,
            low: base.low,
            high: base.high,
            freshness: Freshness::Fresh,
        });
    }

    if zones.len() > MAX_ZONES {
        zones.drain(..zones.len() - MAX_ZONES);
    }

    debug!(count = zones.len(), bars = n, "zones found");
    zones
}
