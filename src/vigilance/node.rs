// =============================================================================
// Vigilance Node — a configured alert with a scoring / cooldown lifecycle
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::vigilance::scoring::{
    simple_score, smart_score, AlertScore, AlertStrength, SimpleTrigger, SmartEvent,
};

pub const DEFAULT_COOLDOWN_MINUTES: u32 = 15;
const MS_PER_MINUTE: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    Simple,
    Smart,
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "SIMPLE"),
            Self::Smart => write!(f, "SMART"),
        }
    }
}

/// Parameters for a smart alert.
#[derive(Debug, Clone, Default)]
pub struct SmartAlertRequest {
    pub pair: String,
    pub timeframe: String,
    pub primary_event: String,
    pub confirmations: Vec<String>,
    pub environment_context: Option<String>,
    pub risk_filters: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VigilanceNode {
    /// UUID v4.
    pub id: String,
    pub pair: String,
    pub alert_type: AlertType,
    /// Trigger or primary-event code, e.g. `RSI_LEVEL`, `LIQUIDITY_SWEEP`.
    pub trigger: String,
    pub timeframe: String,
    pub confidence_score: u8,
    pub strength: AlertStrength,
    pub is_active: bool,
    pub cooldown_minutes: u32,
    /// Monotonic clock reading (ms) of the last trigger.
    pub last_triggered_at: Option<u64>,
    pub confirmations: Vec<String>,
    pub environment_context: Option<String>,
    pub risk_filters: Vec<String>,
    pub description: String,
    /// ISO 8601 creation time, display only.
    pub created_at: String,
}

impl VigilanceNode {
    /// Create a simple alert. Strength is always EARLY_STRUCTURE.
    pub fn simple(
        pair: impl Into<String>,
        trigger: &str,
        timeframe: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let trigger = SimpleTrigger::from_code(trigger);
        let score = simple_score(&trigger);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pair: pair.into(),
            alert_type: AlertType::Simple,
            trigger: trigger.code().to_string(),
            timeframe: timeframe.into(),
            confidence_score: score.total,
            strength: AlertStrength::EarlyStructure,
            is_active: true,
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            last_triggered_at: None,
            confirmations: Vec::new(),
            environment_context: None,
            risk_filters: Vec::new(),
            description: description.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn smart(request: SmartAlertRequest) -> Self {
        let event = SmartEvent::from_code(&request.primary_event);
        let score = smart_score(
            &event,
            request.confirmations.len(),
            request.environment_context.as_deref(),
        );
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pair: request.pair,
            alert_type: AlertType::Smart,
            trigger: event.code().to_string(),
            timeframe: request.timeframe,
            confidence_score: score.total,
            strength: AlertStrength::from_score(score.total),
            is_active: true,
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            last_triggered_at: None,
            confirmations: request.confirmations,
            environment_context: request.environment_context,
            risk_filters: request.risk_filters,
            description: request.description,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Replace the confirmations and context of a smart node with the latest
    /// observation and re-score it. Simple nodes are left unchanged.
    pub fn refresh_smart(
        &mut self,
        confirmations: Vec<String>,
        environment_context: Option<String>,
    ) {
        if self.alert_type != AlertType::Smart {
            return;
        }
        self.confirmations = confirmations;
        self.environment_context = environment_context;
        let total = self.score().total;
        self.confidence_score = total;
        self.strength = AlertStrength::from_score(total);
    }

    pub fn with_cooldown(mut self, minutes: u32) -> Self {
        self.cooldown_minutes = minutes;
        self
    }

    /// Re-derive the itemised score from the node's own fields.
    pub fn score(&self) -> AlertScore {
        match self.alert_type {
            AlertType::Simple => simple_score(&SimpleTrigger::from_code(&self.trigger)),
            AlertType::Smart => smart_score(
                &SmartEvent::from_code(&self.trigger),
                self.confirmations.len(),
                self.environment_context.as_deref(),
            ),
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        u64::from(self.cooldown_minutes) * MS_PER_MINUTE
    }

    /// Cooldown gate. Inactive nodes never trigger; a node that has never
    /// fired is immediately eligible.
    pub fn can_trigger_at(&self, now_ms: u64) -> bool {
        if !self.is_active {
            return false;
        }
        match self.last_triggered_at {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.cooldown_ms(),
        }
    }
}
