// =============================================================================
// Structure Classifier
// =============================================================================
//
// Reads directional bias from where the last close sits relative to the
// window's closing extremes. Fixed 1% bands:
//
//   last > max(close) * 0.99   → BULLISH / BOS
//   last < min(close) * 1.01   → BEARISH / CHoCH
//   otherwise                  → RANGE / CONSOLIDATION
//
// Fewer than 10 bars → RANGE / NONE.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::market_data::Bar;
use crate::types::{Bias, StructureEvent};

/// Minimum number of bars before structure is judged.
pub const MIN_STRUCTURE_BARS: usize = 10;

/// Bias plus the event that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureState {
    pub bias: Bias,
    pub event: StructureEvent,
}

impl StructureState {
    pub const fn new(bias: Bias, event: StructureEvent) -> Self {
        Self { bias, event }
    }

    /// The cold-start result for too-short input.
    pub const fn undetermined() -> Self {
        Self::new(Bias::Range, StructureEvent::None)
    }
}

/// Classify structure over the whole supplied window.
pub fn classify_structure(bars: &[Bar]) -> StructureState {
    if bars.len() < MIN_STRUCTURE_BARS {
        return StructureState::undetermined();
    }

    let Some(last) = bars.last().map(|b| b.close) else {
        return StructureState::undetermined();
    };
    let high = bars.iter().map(|b| b.close).fold(f64::NEG_INFINITY, f64::max);
    let low = bars.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);

    let state = if last > high * 0.99 {
        StructureState::new(Bias::Bullish, StructureEvent::Bos)
    } else if last < low * 1.01 {
        StructureState::new(Bias::Bearish, StructureEvent::Choch)
    } else {
        StructureState::new(Bias::Range, StructureEvent::Consolidation)
    };

    trace!(last, high, low, bias = %state.bias, event = %state.event, "structure classified");
    state
}
