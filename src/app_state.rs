// =============================================================================
// Engine State — Vigil scoring engine
// =============================================================================
//
// Ties the configuration, bar buffer and the three vigilance stores together
// so callers receive them by injection instead of through globals. Each store
// manages its own interior mutability; this struct only holds `Arc`s.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the config and the latest analyses.
//   - One mutex per vigilance store (inside the store).
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, MonotonicClock};
use crate::market_data::{BarBuffer, BarKey};
use crate::runtime_config::RuntimeConfig;
use crate::signals::{analyze, MarketAnalysis};
use crate::vigilance::{
    AuditArchive, AuditRecord, MonitorDecision, RejectedPattern, RejectionLog, VigilanceMonitor,
    VigilanceNode, VigilanceRegistry,
};

/// Audit records included in a snapshot.
const SNAPSHOT_AUDIT_RECORDS: usize = 20;

/// Result of evaluating one pair.
#[derive(Debug, Clone, Serialize)]
pub struct PairEvaluation {
    pub analysis: MarketAnalysis,
    pub decision: MonitorDecision,
}

/// Serialisable view of the whole engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub version: u64,
    pub generated_at: String,
    pub uptime_secs: u64,
    pub pairs: Vec<String>,
    pub timeframe: String,
    pub analyses: Vec<MarketAnalysis>,
    pub nodes: Vec<VigilanceNode>,
    pub recent_rejections: Vec<RejectedPattern>,
    pub recent_audit: Vec<AuditRecord>,
}

pub struct EngineState {
    /// Incremented on every evaluation that changes visible state.
    pub state_version: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub bar_buffer: Arc<BarBuffer>,

    pub registry: Arc<VigilanceRegistry>,
    pub rejections: Arc<RejectionLog>,
    pub archive: Arc<AuditArchive>,

    /// Latest analysis per pair.
    pub last_analyses: RwLock<HashMap<String, MarketAnalysis>>,

    pub start_time: std::time::Instant,
}

impl EngineState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    /// Construct with an explicit clock (replays, tests).
    pub fn with_clock(config: RuntimeConfig, clock: Arc<dyn Clock>) -> Self {
        let capacity = config.bar_buffer_capacity;
        Self {
            state_version: AtomicU64::new(1),
            runtime_config: Arc::new(RwLock::new(config)),
            bar_buffer: Arc::new(BarBuffer::new(capacity)),
            registry: Arc::new(VigilanceRegistry::new(clock)),
            rejections: Arc::new(RejectionLog::new()),
            archive: Arc::new(AuditArchive::new()),
            last_analyses: RwLock::new(HashMap::new()),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    /// Monitor bound to the current config values.
    pub fn monitor(&self) -> VigilanceMonitor {
        let config = self.runtime_config.read();
        VigilanceMonitor::new(
            self.registry.clone(),
            self.rejections.clone(),
            self.archive.clone(),
            config.min_alert_confidence,
            config.risk_filters.clone(),
        )
    }

    /// Analyse the buffered bars of one pair and run the alert monitor on the
    /// result. Returns `None` when no bars are buffered for the pair.
    pub fn evaluate_pair(&self, pair: &str) -> Option<PairEvaluation> {
        let (timeframe, window) = {
            let config = self.runtime_config.read();
            (config.timeframe.clone(), config.analysis_window)
        };
        let key = BarKey::new(pair, &timeframe);
        let bars = self.bar_buffer.recent(&key, window);
        if bars.is_empty() {
            debug!(key = %key, "no bars buffered, skipping");
            return None;
        }

        let analysis = analyze(pair, &timeframe, &bars);
        let decision = self.monitor().evaluate(&analysis);

        self.last_analyses
            .write()
            .insert(pair.to_string(), analysis.clone());
        self.increment_version();

        Some(PairEvaluation { analysis, decision })
    }

    /// Evaluate every configured pair in config order.
    pub fn evaluate_all(&self) -> Vec<PairEvaluation> {
        let pairs = self.runtime_config.read().pairs.clone();
        pairs.iter().filter_map(|p| self.evaluate_pair(p)).collect()
    }

    pub fn build_snapshot(&self) -> EngineSnapshot {
        let config = self.runtime_config.read();
        let analyses = {
            let map = self.last_analyses.read();
            config
                .pairs
                .iter()
                .filter_map(|p| map.get(p).cloned())
                .collect()
        };

        EngineSnapshot {
            version: self.current_state_version(),
            generated_at: Utc::now().to_rfc3339(),
            uptime_secs: self.start_time.elapsed().as_secs(),
            pairs: config.pairs.clone(),
            timeframe: config.timeframe.clone(),
            analyses,
            nodes: self.registry.list(),
            recent_rejections: self.rejections.recent(),
            recent_audit: self.archive.recent(SNAPSHOT_AUDIT_RECORDS),
        }
    }
}
