// =============================================================================
// Audit Archive — auditable record of every alert decision
// =============================================================================
//
// Each evaluation of a candidate alert leaves one record: whether it
// triggered, was held back by cooldown, was rejected, or was cleared. The
// archive is trimmed oldest-first at MAX_AUDIT_RECORDS.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub const MAX_AUDIT_RECORDS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    Triggered,
    Cooldown,
    Rejected,
    Cleared,
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Triggered => write!(f, "TRIGGERED"),
            Self::Cooldown => write!(f, "COOLDOWN"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Cleared => write!(f, "CLEARED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// UUID v4.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub pair: String,
    pub trigger: String,
    pub outcome: AuditOutcome,
    pub confidence: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// ISO 8601 timestamp.
    pub at: String,
}

impl AuditRecord {
    pub fn new(
        node_id: Option<String>,
        pair: impl Into<String>,
        trigger: impl Into<String>,
        outcome: AuditOutcome,
        confidence: u8,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            node_id,
            pair: pair.into(),
            trigger: trigger.into(),
            outcome,
            confidence,
            reason: None,
            at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Default)]
pub struct AuditArchive {
    records: Mutex<VecDeque<AuditRecord>>,
}

impl AuditArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: AuditRecord) {
        let mut records = self.records.lock();
        records.push_back(record);
        while records.len() > MAX_AUDIT_RECORDS {
            records.pop_front();
        }
    }

    /// The newest `count` records, oldest first.
    pub fn recent(&self, count: usize) -> Vec<AuditRecord> {
        let records = self.records.lock();
        let start = records.len().saturating_sub(count);
        records.iter().skip(start).cloned().collect()
    }

    pub fn for_node(&self, node_id: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.node_id.as_deref() == Some(node_id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
