// =============================================================================
// PriceSeries input adapter
// =============================================================================
//
// Normalises an ordered slice of bars into the flat arrays the classifiers
// read. Nothing here allocates per-call state beyond the returned vectors.

use crate::market_data::Bar;

/// The trailing `n` bars of `bars` (all of them when fewer are available).
pub fn trailing(bars: &[Bar], n: usize) -> &[Bar] {
    &bars[bars.len().saturating_sub(n)..]
}

/// Borrowed view over a chronological bar slice.
#[derive(Debug, Clone, Copy)]
pub struct PriceSeries<'a> {
    bars: &'a [Bar],
}

impl<'a> PriceSeries<'a> {
    pub fn new(bars: &'a [Bar]) -> Self {
        Self { bars }
    }

    /// View over the last `n` bars only.
    pub fn window(&self, n: usize) -> PriceSeries<'a> {
        PriceSeries::new(trailing(self.bars, n))
    }

    pub fn bars(&self) -> &'a [Bar] {
        self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&'a Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Absolute candle body `|close - open|` per bar.
    pub fn bodies(&self) -> Vec<f64> {
        self.bars.iter().map(|b| (b.close - b.open).abs()).collect()
    }

    /// High-low range per bar.
    pub fn ranges(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high - b.low).collect()
    }
}

impl<'a> From<&'a [Bar]> for PriceSeries<'a> {
    fn from(bars: &'a [Bar]) -> Self {
        Self::new(bars)
    }
}
