// =============================================================================
// Vigilance Monitor — turns a market analysis into an alert decision
// =============================================================================
//
// Pipeline for one analysis:
//
//   1. Primary event:  sweep → LIQUIDITY_SWEEP, else CHoCH →
//      CHANGE_OF_CHARACTER, else BOS → BREAKOUT_STRUCTURE, else nothing.
//   2. Confirmations and environment context are read off the same analysis
//      and scored as a smart alert.
//   3. Candidates under the confidence floor are rejected (rejection log +
//      archive).
//   4. Accepted candidates reuse the node for (pair, timeframe, event) or
//      create one, then pass through the cooldown gate.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::signals::MarketAnalysis;
use crate::types::{Bias, LevelStrength, StructureEvent, TrendStrength, VolatilityLabel};
use crate::vigilance::audit::{AuditArchive, AuditOutcome, AuditRecord};
use crate::vigilance::node::SmartAlertRequest;
use crate::vigilance::registry::VigilanceRegistry;
use crate::vigilance::rejections::{RejectedPattern, RejectionLog};
use crate::vigilance::scoring::{smart_score, SmartEvent};

/// Outcome of evaluating one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitorDecision {
    /// Nothing alert-worthy in the analysis.
    NoEvent,
    Rejected { trigger: String, confidence: u8, reason: String },
    Triggered { node_id: String, trigger: String, confidence: u8 },
    Cooldown { node_id: String, trigger: String },
    /// The matching node was cleared by the user and stays silent.
    Cleared { node_id: String, trigger: String },
}

pub struct VigilanceMonitor {
    registry: Arc<VigilanceRegistry>,
    rejections: Arc<RejectionLog>,
    archive: Arc<AuditArchive>,
    min_confidence: u8,
    risk_filters: Vec<String>,
}

impl VigilanceMonitor {
    pub fn new(
        registry: Arc<VigilanceRegistry>,
        rejections: Arc<RejectionLog>,
        archive: Arc<AuditArchive>,
        min_confidence: u8,
        risk_filters: Vec<String>,
    ) -> Self {
        Self {
            registry,
            rejections,
            archive,
            min_confidence,
            risk_filters,
        }
    }

    pub fn evaluate(&self, analysis: &MarketAnalysis) -> MonitorDecision {
        let Some(event) = primary_event(analysis) else {
            return MonitorDecision::NoEvent;
        };
        let trigger = event.code().to_string();
        let confirmations = confirmations(analysis, &event);
        let context = environment_context(analysis);
        let score = smart_score(&event, confirmations.len(), context.as_deref());

        // ── Confidence floor ─────────────────────────────────────────────
        if score.total < self.min_confidence {
            let reason = format!(
                "confidence {} < {} floor ({} confirmations)",
                score.total,
                self.min_confidence,
                confirmations.len()
            );
            self.rejections.record(RejectedPattern::new(
                &analysis.pair,
                &analysis.timeframe,
                &trigger,
                &reason,
                score.total,
            ));
            self.archive.push(
                AuditRecord::new(None, &analysis.pair, &trigger, AuditOutcome::Rejected, score.total)
                    .with_reason(&reason),
            );
            return MonitorDecision::Rejected {
                trigger,
                confidence: score.total,
                reason,
            };
        }

        // ── Resolve node ─────────────────────────────────────────────────
        let node = self.registry.find_or_create_smart(SmartAlertRequest {
            pair: analysis.pair.clone(),
            timeframe: analysis.timeframe.clone(),
            primary_event: trigger.clone(),
            confirmations,
            environment_context: context,
            risk_filters: self.risk_filters.clone(),
            description: describe(analysis, &event),
        });

        if !node.is_active {
            self.archive.push(AuditRecord::new(
                Some(node.id.clone()),
                &node.pair,
                &trigger,
                AuditOutcome::Cleared,
                node.confidence_score,
            ));
            return MonitorDecision::Cleared {
                node_id: node.id,
                trigger,
            };
        }

        // ── Cooldown gate ────────────────────────────────────────────────
        if self.registry.trigger(&node.id) {
            self.archive.push(AuditRecord::new(
                Some(node.id.clone()),
                &node.pair,
                &trigger,
                AuditOutcome::Triggered,
                node.confidence_score,
            ));
            MonitorDecision::Triggered {
                node_id: node.id,
                trigger,
                confidence: node.confidence_score,
            }
        } else {
            debug!(node_id = %node.id, trigger = %trigger, "alert held by cooldown");
            self.archive.push(
                AuditRecord::new(
                    Some(node.id.clone()),
                    &node.pair,
                    &trigger,
                    AuditOutcome::Cooldown,
                    node.confidence_score,
                )
                .with_reason(format!("cooldown {}m active", node.cooldown_minutes)),
            );
            MonitorDecision::Cooldown {
                node_id: node.id,
                trigger,
            }
        }
    }
}

/// The alert-worthy event in an analysis, strongest table entry first.
pub fn primary_event(analysis: &MarketAnalysis) -> Option<SmartEvent> {
    if analysis.sweep.is_some() {
        return Some(SmartEvent::LiquiditySweep);
    }
    match analysis.structure.event {
        StructureEvent::Choch => Some(SmartEvent::ChangeOfCharacter),
        StructureEvent::Bos => Some(SmartEvent::BreakoutStructure),
        StructureEvent::Consolidation | StructureEvent::None => None,
    }
}

/// Supporting conditions observed alongside the primary event.
pub fn confirmations(analysis: &MarketAnalysis, event: &SmartEvent) -> Vec<String> {
    let mut out = Vec::new();

    if *event == SmartEvent::LiquiditySweep && analysis.structure.bias != Bias::Range {
        out.push(format!("STRUCTURE_{}", analysis.structure.bias));
    }
    if analysis.trend.volatility == VolatilityLabel::Normal {
        out.push("VOLATILITY_NORMAL".to_string());
    }
    if analysis.trend.strength == TrendStrength::Strong {
        out.push("TREND_STRONG".to_string());
    }
    if !analysis.zones.is_empty() {
        out.push("FRESH_ZONE".to_string());
    }
    if analysis
        .levels
        .iter()
        .any(|l| l.strength == LevelStrength::High)
    {
        out.push("KEY_LEVEL_HIGH".to_string());
    }
    if !analysis.pools.is_empty() {
        out.push("LIQUIDITY_POOL".to_string());
    }
    out
}

/// Volatility regime worth flagging: expansion or compression.
pub fn environment_context(analysis: &MarketAnalysis) -> Option<String> {
    match analysis.trend.volatility {
        VolatilityLabel::High => Some("EXPANSION".to_string()),
        VolatilityLabel::Low => Some("COMPRESSION".to_string()),
        VolatilityLabel::Normal => None,
    }
}

fn describe(analysis: &MarketAnalysis, event: &SmartEvent) -> String {
    match (event, analysis.sweep) {
        (SmartEvent::LiquiditySweep, Some(sweep)) => format!(
            "{} {} sweep of {:.5} on {}",
            analysis.pair, sweep.side, sweep.level, analysis.timeframe
        ),
        _ => format!(
            "{} {} {} on {}",
            analysis.pair, analysis.structure.bias, analysis.structure.event, analysis.timeframe
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::market_data::Bar;
    use crate::signals::analyze;

    struct Fixture {
        clock: Arc<ManualClock>,
        registry: Arc<VigilanceRegistry>,
        rejections: Arc<RejectionLog>,
        archive: Arc<AuditArchive>,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new(0));
            Self {
                registry: Arc::new(VigilanceRegistry::new(clock.clone())),
                clock,
                rejections: Arc::new(RejectionLog::new()),
                archive: Arc::new(AuditArchive::new()),
            }
        }

        fn monitor(&self, min_confidence: u8) -> VigilanceMonitor {
            VigilanceMonitor::new(
                self.registry.clone(),
                self.rejections.clone(),
                self.archive.clone(),
                min_confidence,
                vec!["NEWS_BLACKOUT".into()],
            )
        }
    }

    /// Steady climb: BULLISH / BOS, no sweep, NORMAL volatility.
    fn breakout_bars() -> Vec<Bar> {
        (0..30)
            .map(|i| {
                let c = 1.0 + i as f64 * 0.002;
                Bar::new(i, c - 0.001, c + 0.0005, c - 0.0015, c)
            })
            .collect()
    }

    /// Ranging series with a mid-range last close.
    fn range_bars() -> Vec<Bar> {
        (0..30)
            .map(|i| {
                let c: f64 = if i % 2 == 0 { 1.00 } else { 1.04 };
                Bar::new(i, 1.02, c.max(1.02) + 0.001, c.min(1.02) - 0.001, c)
            })
            .chain(std::iter::once(Bar::new(30, 1.02, 1.025, 1.015, 1.02)))
            .collect()
    }

    #[test]
    fn consolidation_raises_no_event() {
        let fx = Fixture::new();
        let analysis = analyze("EURUSD", "H1", &range_bars());
        assert_eq!(analysis.structure.event, StructureEvent::Consolidation);
        assert_eq!(fx.monitor(0).evaluate(&analysis), MonitorDecision::NoEvent);
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn breakout_is_registered_and_triggered_once_per_cooldown() {
        let fx = Fixture::new();
        let monitor = fx.monitor(0);
        let analysis = analyze("EURUSD", "H1", &breakout_bars());
        assert_eq!(primary_event(&analysis), Some(SmartEvent::BreakoutStructure));

        let first = monitor.evaluate(&analysis);
        let MonitorDecision::Triggered { node_id, trigger, .. } = first.clone() else {
            panic!("expected trigger, got {first:?}");
        };
        assert_eq!(trigger, "BREAKOUT_STRUCTURE");
        let node = fx.registry.get(&node_id).unwrap();
        assert_eq!(node.risk_filters, vec!["NEWS_BLACKOUT".to_string()]);

        assert!(matches!(monitor.evaluate(&analysis), MonitorDecision::Cooldown { .. }));
        assert_eq!(fx.registry.len(), 1);

        fx.clock.advance(node.cooldown_ms());
        assert!(matches!(monitor.evaluate(&analysis), MonitorDecision::Triggered { .. }));
        assert_eq!(fx.archive.for_node(&node_id).len(), 3);
    }

    #[test]
    fn low_confidence_is_rejected_and_logged() {
        let fx = Fixture::new();
        let analysis = analyze("EURUSD", "H1", &breakout_bars());
        let decision = fx.monitor(100).evaluate(&analysis);
        assert!(matches!(decision, MonitorDecision::Rejected { .. }));
        assert!(fx.registry.is_empty());
        assert_eq!(fx.rejections.len(), 1);
        assert_eq!(fx.rejections.recent()[0].pattern, "BREAKOUT_STRUCTURE");
        assert_eq!(fx.archive.recent(1)[0].outcome, AuditOutcome::Rejected);
    }

    #[test]
    fn cleared_node_stays_silent() {
        let fx = Fixture::new();
        let monitor = fx.monitor(0);
        let analysis = analyze("EURUSD", "H1", &breakout_bars());
        let MonitorDecision::Triggered { node_id, .. } = monitor.evaluate(&analysis) else {
            panic!("expected trigger");
        };
        fx.registry.clear(&node_id);
        fx.clock.advance(u64::from(u32::MAX));
        assert!(matches!(monitor.evaluate(&analysis), MonitorDecision::Cleared { .. }));
    }

    #[test]
    fn reused_node_reports_current_confidence() {
        let fx = Fixture::new();
        let stale = fx.registry.create_smart(SmartAlertRequest {
            pair: "EURUSD".into(),
            timeframe: "H1".into(),
            primary_event: "BREAKOUT_STRUCTURE".into(),
            ..Default::default()
        });
        assert_eq!(stale.confidence_score, 45);

        let analysis = analyze("EURUSD", "H1", &breakout_bars());
        let event = SmartEvent::BreakoutStructure;
        let conf = confirmations(&analysis, &event);
        let expected = smart_score(&event, conf.len(), environment_context(&analysis).as_deref()).total;
        assert!(expected > 45);

        let decision = fx.monitor(0).evaluate(&analysis);
        assert_eq!(
            decision,
            MonitorDecision::Triggered {
                node_id: stale.id.clone(),
                trigger: "BREAKOUT_STRUCTURE".into(),
                confidence: expected,
            }
        );
        let node = fx.registry.get(&stale.id).unwrap();
        assert_eq!(node.confidence_score, expected);
        assert_eq!(node.confirmations, conf);
        assert_eq!(fx.archive.recent(1)[0].confidence, expected);
        assert_eq!(fx.registry.len(), 1);
    }

    #[test]
    fn concurrent_evaluations_share_one_node() {
        for _ in 0..50 {
            let fx = Fixture::new();
            let monitor = Arc::new(fx.monitor(0));
            let analysis = Arc::new(analyze("EURUSD", "H1", &breakout_bars()));
            let barrier = Arc::new(std::sync::Barrier::new(8));
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let monitor = monitor.clone();
                    let analysis = analysis.clone();
                    let barrier = barrier.clone();
                    std::thread::spawn(move || {
                        barrier.wait();
                        monitor.evaluate(&analysis)
                    })
                })
                .collect();
            let decisions: Vec<MonitorDecision> =
                handles.into_iter().map(|h| h.join().unwrap()).collect();
            let triggered = decisions
                .iter()
                .filter(|d| matches!(d, MonitorDecision::Triggered { .. }))
                .count();
            assert_eq!(fx.registry.len(), 1);
            assert_eq!(triggered, 1);
        }
    }

    #[test]
    fn normal_volatility_has_no_context() {
        let analysis = analyze("EURUSD", "H1", &breakout_bars());
        assert!(environment_context(&analysis).is_none());
        let conf = confirmations(&analysis, &SmartEvent::BreakoutStructure);
        assert!(conf.contains(&"VOLATILITY_NORMAL".to_string()));
    }
}
