use std::collections::{HashMap, VecDeque};
use std::path::Path;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar supplied by the market-data collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time (seconds or milliseconds; only ordering matters).
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    /// `low <= min(open, close) <= max(open, close) <= high`, all finite and
    /// non-negative.
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return false;
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return false;
        }
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }
}

/// Composite key that identifies a unique bar series.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct BarKey {
    pub pair: String,
    pub timeframe: String,
}

impl BarKey {
    pub fn new(pair: impl Into<String>, timeframe: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            timeframe: timeframe.into(),
        }
    }
}

impl std::fmt::Display for BarKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.pair, self.timeframe)
    }
}

// ---------------------------------------------------------------------------
// BarBuffer -- thread-safe ring buffer per (pair, timeframe)
// ---------------------------------------------------------------------------

/// Thread-safe ring buffer that stores the most recent bars per
/// `(pair, timeframe)`. A bar whose timestamp equals the newest stored bar
/// replaces it (in-progress update); anything older is dropped so the series
/// stays chronological.
pub struct BarBuffer {
    buffers: RwLock<HashMap<BarKey, VecDeque<Bar>>>,
    max_bars: usize,
}

impl BarBuffer {
    pub fn new(max_bars: usize) -> Self {
        Self {
            buffers: RwLock::new(HashMap::new()),
            max_bars,
        }
    }

    /// Insert or replace the latest bar for the given key.
    ///
    /// Returns `false` when the bar was rejected (malformed or out of order).
    pub fn push(&self, key: BarKey, bar: Bar) -> bool {
        if !bar.is_well_formed() {
            warn!(key = %key, timestamp = bar.timestamp, "dropping malformed bar");
            return false;
        }

        let mut map = self.buffers.write();
        let ring = map
            .entry(key)
            .or_insert_with(|| VecDeque::with_capacity(self.max_bars + 1));

        if let Some(last) = ring.back() {
            if bar.timestamp < last.timestamp {
                return false;
            }
            if bar.timestamp == last.timestamp {
                ring.pop_back();
            }
        }
        ring.push_back(bar);
        while ring.len() > self.max_bars {
            ring.pop_front();
        }
        true
    }

    /// Append many bars in order. Returns how many were accepted.
    pub fn extend(&self, key: &BarKey, bars: impl IntoIterator<Item = Bar>) -> usize {
        bars.into_iter()
            .filter(|bar| self.push(key.clone(), bar.clone()))
            .count()
    }

    /// Return the most recent `count` bars (oldest-first order).
    pub fn recent(&self, key: &BarKey, count: usize) -> Vec<Bar> {
        let map = self.buffers.read();
        match map.get(key) {
            Some(ring) => {
                let start = ring.len().saturating_sub(count);
                ring.iter().skip(start).cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// Close of the most recent bar, if any.
    pub fn last_close(&self, key: &BarKey) -> Option<f64> {
        let map = self.buffers.read();
        map.get(key).and_then(|ring| ring.back().map(|b| b.close))
    }

    /// Timestamp of the most recent bar, if any.
    pub fn last_timestamp(&self, key: &BarKey) -> Option<i64> {
        let map = self.buffers.read();
        map.get(key).and_then(|ring| ring.back().map(|b| b.timestamp))
    }

    pub fn count(&self, key: &BarKey) -> usize {
        let map = self.buffers.read();
        map.get(key).map_or(0, VecDeque::len)
    }
}

// ---------------------------------------------------------------------------
// Bar files
// ---------------------------------------------------------------------------

/// Path of the bar file for `key` inside `dir`: `<dir>/<PAIR>_<TIMEFRAME>.json`.
pub fn bar_file_path(dir: impl AsRef<Path>, key: &BarKey) -> std::path::PathBuf {
    dir.as_ref()
        .join(format!("{}_{}.json", key.pair, key.timeframe))
}

/// Load a JSON array of bars from `path`.
pub fn load_bars_file(path: impl AsRef<Path>) -> Result<Vec<Bar>> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bars from {}", path.display()))?;

    let bars: Vec<Bar> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse bars from {}", path.display()))?;

    debug!(path = %path.display(), count = bars.len(), "bar file parsed");
    Ok(bars)
}

/// Load the bar file for `key` from `dir` into `buffer`. Bars older than the
/// newest buffered bar are skipped, so re-reading a growing file only appends
/// the new tail (and refreshes the in-progress last bar).
pub fn feed_from_dir(buffer: &BarBuffer, dir: impl AsRef<Path>, key: &BarKey) -> Result<usize> {
    let path = bar_file_path(dir, key);
    let mut bars = load_bars_file(&path)?;
    if let Some(last) = buffer.last_timestamp(key) {
        bars.retain(|b| b.timestamp >= last);
    }
    let total = bars.len();
    let accepted = buffer.extend(key, bars);
    if accepted < total {
        warn!(key = %key, total, accepted, "some bars were rejected");
    }
    debug!(key = %key, accepted, "bars loaded");
    Ok(accepted)
}
