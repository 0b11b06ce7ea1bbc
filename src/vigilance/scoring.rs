// =============================================================================
// Alert Scoring — base-score tables and strength tiers
// =============================================================================
//
// Simple alerts score from the trigger table alone and never escalate past
// EARLY_STRUCTURE. Smart alerts add confirmations and context:
//
//   score = base(event) + 12 * confirmations + (8 if context non-empty)
//   clamped to [0, 100]
//
//   STRONG  ≥ 75,  MEDIUM ≥ 50,  EARLY_STRUCTURE otherwise
//
// Unknown trigger / event codes are carried verbatim in `Other` and score
// the table default of 40.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_SCORE: i32 = 40;
pub const CONFIRMATION_POINTS: i32 = 12;
pub const CONTEXT_POINTS: i32 = 8;

// =============================================================================
// Strength tiers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStrength {
    Strong,
    Medium,
    EarlyStructure,
}

impl AlertStrength {
    pub fn from_score(score: u8) -> Self {
        if score >= 75 {
            Self::Strong
        } else if score >= 50 {
            Self::Medium
        } else {
            Self::EarlyStructure
        }
    }
}

impl std::fmt::Display for AlertStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "STRONG"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::EarlyStructure => write!(f, "EARLY_STRUCTURE"),
        }
    }
}

// =============================================================================
// Simple triggers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimpleTrigger {
    PriceThreshold,
    RsiLevel,
    MaCross,
    TrendlineBreak,
    Other(String),
}

impl SimpleTrigger {
    pub fn from_code(code: &str) -> Self {
        match code {
            "PRICE_THRESHOLD" => Self::PriceThreshold,
            "RSI_LEVEL" => Self::RsiLevel,
            "MA_CROSS" => Self::MaCross,
            "TRENDLINE_BREAK" => Self::TrendlineBreak,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::PriceThreshold => "PRICE_THRESHOLD",
            Self::RsiLevel => "RSI_LEVEL",
            Self::MaCross => "MA_CROSS",
            Self::TrendlineBreak => "TRENDLINE_BREAK",
            Self::Other(code) => code.as_str(),
        }
    }

    pub fn base_score(&self) -> i32 {
        match self {
            Self::PriceThreshold => 35,
            Self::RsiLevel => 45,
            Self::MaCross => 50,
            Self::TrendlineBreak => 40,
            Self::Other(_) => DEFAULT_BASE_SCORE,
        }
    }
}

// =============================================================================
// Smart primary events
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SmartEvent {
    ChangeOfCharacter,
    LiquiditySweep,
    BreakoutStructure,
    Other(String),
}

impl SmartEvent {
    pub fn from_code(code: &str) -> Self {
        match code {
            "CHANGE_OF_CHARACTER" => Self::ChangeOfCharacter,
            "LIQUIDITY_SWEEP" => Self::LiquiditySweep,
            "BREAKOUT_STRUCTURE" => Self::BreakoutStructure,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ChangeOfCharacter => "CHANGE_OF_CHARACTER",
            Self::LiquiditySweep => "LIQUIDITY_SWEEP",
            Self::BreakoutStructure => "BREAKOUT_STRUCTURE",
            Self::Other(code) => code.as_str(),
        }
    }

    pub fn base_score(&self) -> i32 {
        match self {
            Self::ChangeOfCharacter => 50,
            Self::LiquiditySweep => 55,
            Self::BreakoutStructure => 45,
            Self::Other(_) => DEFAULT_BASE_SCORE,
        }
    }
}

// =============================================================================
// Score computation
// =============================================================================

/// Itemised alert score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertScore {
    pub base: i32,
    pub confirmations: i32,
    pub context: i32,
    /// Clamped total.
    pub total: u8,
}

impl AlertScore {
    fn new(base: i32, confirmations: i32, context: i32) -> Self {
        let sum = base
            .saturating_add(confirmations)
            .saturating_add(context);
        Self {
            base,
            confirmations,
            context,
            total: sum.clamp(0, 100) as u8,
        }
    }
}

pub fn simple_score(trigger: &SimpleTrigger) -> AlertScore {
    AlertScore::new(trigger.base_score(), 0, 0)
}

pub fn smart_score(
    event: &SmartEvent,
    confirmation_count: usize,
    environment_context: Option<&str>,
) -> AlertScore {
    let count = i32::try_from(confirmation_count).unwrap_or(i32::MAX);
    let confirmations = count.saturating_mul(CONFIRMATION_POINTS);
    let context = match environment_context {
        Some(ctx) if !ctx.is_empty() => CONTEXT_POINTS,
        _ => 0,
    };
    AlertScore::new(event.base_score(), confirmations, context)
}
