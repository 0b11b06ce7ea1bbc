// =============================================================================
// Rejection Log — bounded record of patterns that failed the gates
// =============================================================================
//
// Stores at most MAX_STORED_REJECTIONS entries (oldest evicted first) and
// exposes the newest RECENT_REJECTIONS through `recent()`.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MAX_STORED_REJECTIONS: usize = 20;
pub const RECENT_REJECTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedPattern {
    pub pair: String,
    pub timeframe: String,
    pub pattern: String,
    pub reason: String,
    pub confidence: u8,
    /// ISO 8601 timestamp.
    pub rejected_at: String,
}

impl RejectedPattern {
    pub fn new(
        pair: impl Into<String>,
        timeframe: impl Into<String>,
        pattern: impl Into<String>,
        reason: impl Into<String>,
        confidence: u8,
    ) -> Self {
        Self {
            pair: pair.into(),
            timeframe: timeframe.into(),
            pattern: pattern.into(),
            reason: reason.into(),
            confidence,
            rejected_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Default)]
pub struct RejectionLog {
    entries: Mutex<VecDeque<RejectedPattern>>,
}

impl RejectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, rejection: RejectedPattern) {
        debug!(
            pair = %rejection.pair,
            pattern = %rejection.pattern,
            reason = %rejection.reason,
            "pattern rejected"
        );
        let mut entries = self.entries.lock();
        entries.push_back(rejection);
        while entries.len() > MAX_STORED_REJECTIONS {
            entries.pop_front();
        }
    }

    /// The newest `RECENT_REJECTIONS` entries, oldest first.
    pub fn recent(&self) -> Vec<RejectedPattern> {
        let entries = self.entries.lock();
        let start = entries.len().saturating_sub(RECENT_REJECTIONS);
        entries.iter().skip(start).cloned().collect()
    }

    /// Every stored entry, oldest first.
    pub fn all(&self) -> Vec<RejectedPattern> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(i: usize) -> RejectedPattern {
        RejectedPattern::new("EURUSD", "H1", format!("P{i}"), "below floor", 40)
    }

    #[test]
    fn keeps_twenty_and_exposes_five() {
        let log = RejectionLog::new();
        for i in 0..25 {
            log.record(rejection(i));
        }
        let all = log.all();
        assert_eq!(all.len(), 20);
        assert_eq!(all.first().unwrap().pattern, "P5");
        assert_eq!(all.last().unwrap().pattern, "P24");

        let recent = log.recent();
        assert_eq!(recent.len(), 5);
        let names: Vec<&str> = recent.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(names, vec!["P20", "P21", "P22", "P23", "P24"]);
        assert_eq!(recent.as_slice(), &all[15..]);
    }

    #[test]
    fn recent_with_fewer_than_five() {
        let log = RejectionLog::new();
        log.record(rejection(0));
        log.record(rejection(1));
        assert_eq!(log.recent().len(), 2);
        log.clear();
        assert!(log.is_empty());
    }
}
