// =============================================================================
// Shared label types used across the Vigil scoring engine
// =============================================================================
//
// Every label serialises to the same upper-case code that its `Display`
// implementation prints, so dashboard payloads and log lines agree.

use serde::{Deserialize, Serialize};

/// Directional bias derived from recent structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    Bullish,
    Bearish,
    Range,
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::Range => write!(f, "RANGE"),
        }
    }
}

/// The structural event that produced the current bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureEvent {
    /// Break of structure — continuation through the window extreme.
    #[serde(rename = "BOS")]
    Bos,
    /// Change of character — price pressing the opposite extreme.
    #[serde(rename = "CHoCH")]
    Choch,
    #[serde(rename = "CONSOLIDATION")]
    Consolidation,
    /// Not enough bars to judge.
    #[serde(rename = "NONE")]
    None,
}

impl std::fmt::Display for StructureEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bos => write!(f, "BOS"),
            Self::Choch => write!(f, "CHoCH"),
            Self::Consolidation => write!(f, "CONSOLIDATION"),
            Self::None => write!(f, "NONE"),
        }
    }
}

/// Volatility regime of the latest bar relative to the window average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityLabel {
    High,
    Normal,
    Low,
}

impl std::fmt::Display for VolatilityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Normal => write!(f, "NORMAL"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Trend strength judged by the efficiency ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendStrength {
    Strong,
    Weak,
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "STRONG"),
            Self::Weak => write!(f, "WEAK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneKind {
    Supply,
    Demand,
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Supply => write!(f, "SUPPLY"),
            Self::Demand => write!(f, "DEMAND"),
        }
    }
}

/// Zone freshness. Only `Fresh` is produced today; mitigation tracking
/// would add the other states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Freshness {
    Fresh,
}

/// Side of a key level relative to the price at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelKind {
    Support,
    Resistance,
}

impl std::fmt::Display for LevelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Support => write!(f, "SUPPORT"),
            Self::Resistance => write!(f, "RESISTANCE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelStrength {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for LevelStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Which resting liquidity a sweep or pool refers to: buy stops above
/// highs, or sell stops below lows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquiditySide {
    BuySide,
    SellSide,
}

impl std::fmt::Display for LiquiditySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuySide => write!(f, "BUY_SIDE"),
            Self::SellSide => write!(f, "SELL_SIDE"),
        }
    }
}
