// =============================================================================
// Vigilance Registry — process-lifetime store of alert nodes
// =============================================================================
//
// One `parking_lot::Mutex` guards the whole node list; alert volumes are
// human-scale so contention is negligible. Every id lookup is total: an
// unknown id yields `false`, `None` or an empty map, never a panic.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::vigilance::node::{SmartAlertRequest, VigilanceNode};
use crate::vigilance::scoring::SmartEvent;

pub struct VigilanceRegistry {
    nodes: Mutex<Vec<VigilanceNode>>,
    clock: Arc<dyn Clock>,
}

impl VigilanceRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            nodes: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Append a node and return its id.
    pub fn insert(&self, node: VigilanceNode) -> String {
        let id = node.id.clone();
        info!(
            id = %id,
            pair = %node.pair,
            alert_type = %node.alert_type,
            trigger = %node.trigger,
            confidence = node.confidence_score,
            strength = %node.strength,
            "vigilance node created"
        );
        self.nodes.lock().push(node);
        id
    }

    pub fn create_simple(
        &self,
        pair: &str,
        trigger: &str,
        timeframe: &str,
        description: &str,
    ) -> VigilanceNode {
        let node = VigilanceNode::simple(pair, trigger, timeframe, description);
        self.insert(node.clone());
        node
    }

    pub fn create_smart(&self, request: SmartAlertRequest) -> VigilanceNode {
        let node = VigilanceNode::smart(request);
        self.insert(node.clone());
        node
    }

    /// Return the smart node for `(pair, timeframe, primary event)`, creating
    /// it when absent. An existing node takes the request's confirmations and
    /// context and is re-scored. Lookup and insert share one lock, so
    /// concurrent callers observe a single node per key.
    pub fn find_or_create_smart(&self, request: SmartAlertRequest) -> VigilanceNode {
        let trigger = SmartEvent::from_code(&request.primary_event).code().to_string();
        let mut nodes = self.nodes.lock();

        if let Some(node) = nodes.iter_mut().find(|n| {
            n.pair == request.pair && n.timeframe == request.timeframe && n.trigger == trigger
        }) {
            node.refresh_smart(request.confirmations, request.environment_context);
            debug!(
                id = %node.id,
                confidence = node.confidence_score,
                "vigilance node reused"
            );
            return node.clone();
        }

        let node = VigilanceNode::smart(request);
        info!(
            id = %node.id,
            pair = %node.pair,
            alert_type = %node.alert_type,
            trigger = %node.trigger,
            confidence = node.confidence_score,
            strength = %node.strength,
            "vigilance node created"
        );
        nodes.push(node.clone());
        node
    }

    pub fn get(&self, id: &str) -> Option<VigilanceNode> {
        self.nodes.lock().iter().find(|n| n.id == id).cloned()
    }

    /// First node matching `(pair, timeframe, trigger)`, active or not.
    pub fn find(&self, pair: &str, timeframe: &str, trigger: &str) -> Option<VigilanceNode> {
        self.nodes
            .lock()
            .iter()
            .find(|n| n.pair == pair && n.timeframe == timeframe && n.trigger == trigger)
            .cloned()
    }

    pub fn list(&self) -> Vec<VigilanceNode> {
        self.nodes.lock().clone()
    }

    pub fn active_for_pair(&self, pair: &str) -> Vec<VigilanceNode> {
        self.nodes
            .lock()
            .iter()
            .filter(|n| n.is_active && n.pair == pair)
            .cloned()
            .collect()
    }

    pub fn can_trigger(&self, id: &str) -> bool {
        let now = self.clock.now_ms();
        self.nodes
            .lock()
            .iter()
            .find(|n| n.id == id)
            .is_some_and(|n| n.can_trigger_at(now))
    }

    /// Fire the node if its cooldown gate allows it, stamping
    /// `last_triggered_at`. Returns whether it fired.
    pub fn trigger(&self, id: &str) -> bool {
        let now = self.clock.now_ms();
        let mut nodes = self.nodes.lock();
        let Some(node) = nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if !node.can_trigger_at(now) {
            debug!(id, "trigger suppressed by cooldown");
            return false;
        }
        node.last_triggered_at = Some(now);
        info!(id, pair = %node.pair, trigger = %node.trigger, "vigilance node triggered");
        true
    }

    /// Deactivate a node. Returns `false` for an unknown id.
    pub fn clear(&self, id: &str) -> bool {
        let mut nodes = self.nodes.lock();
        match nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.is_active = false;
                info!(id, "vigilance node cleared");
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &str) -> Option<VigilanceNode> {
        let mut nodes = self.nodes.lock();
        let pos = nodes.iter().position(|n| n.id == id)?;
        Some(nodes.remove(pos))
    }

    /// Itemised score: `base`, `confirmations`, `context`, `total`. Empty for
    /// an unknown id.
    pub fn score_breakdown(&self, id: &str) -> BTreeMap<String, i32> {
        let Some(node) = self.get(id) else {
            return BTreeMap::new();
        };
        let score = node.score();
        BTreeMap::from([
            ("base".to_string(), score.base),
            ("confirmations".to_string(), score.confirmations),
            ("context".to_string(), score.context),
            ("total".to_string(), i32::from(score.total)),
        ])
    }

    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.lock().is_empty()
    }

    pub fn reset(&self) {
        self.nodes.lock().clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn registry() -> (Arc<ManualClock>, VigilanceRegistry) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let reg = VigilanceRegistry::new(clock.clone());
        (clock, reg)
    }

    #[test]
    fn unknown_ids_are_neutral() {
        let (_, reg) = registry();
        assert!(!reg.can_trigger("nope"));
        assert!(!reg.trigger("nope"));
        assert!(!reg.clear("nope"));
        assert!(reg.get("nope").is_none());
        assert!(reg.remove("nope").is_none());
        assert!(reg.score_breakdown("nope").is_empty());
    }

    #[test]
    fn trigger_respects_cooldown() {
        let (clock, reg) = registry();
        let node = reg.create_simple("EURUSD", "PRICE_THRESHOLD", "H1", "1.1000");
        assert!(reg.trigger(&node.id));
        assert!(!reg.trigger(&node.id));

        clock.advance(node.cooldown_ms() - 1);
        assert!(!reg.can_trigger(&node.id));
        clock.advance(1);
        assert!(reg.can_trigger(&node.id));
        assert!(reg.trigger(&node.id));
        assert_eq!(reg.get(&node.id).unwrap().last_triggered_at, Some(clock.now_ms()));
    }

    #[test]
    fn cleared_node_never_triggers() {
        let (_, reg) = registry();
        let node = reg.create_simple("EURUSD", "RSI_LEVEL", "H1", "");
        assert!(reg.clear(&node.id));
        assert!(!reg.can_trigger(&node.id));
        assert!(reg.active_for_pair("EURUSD").is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn score_breakdown_itemises_smart_node() {
        let (_, reg) = registry();
        let node = reg.create_smart(SmartAlertRequest {
            pair: "XAUUSD".into(),
            timeframe: "M15".into(),
            primary_event: "CHANGE_OF_CHARACTER".into(),
            confirmations: vec!["VOLATILITY_NORMAL".into()],
            environment_context: Some("TREND_STRONG".into()),
            ..Default::default()
        });
        let b = reg.score_breakdown(&node.id);
        assert_eq!(b["base"], 50);
        assert_eq!(b["confirmations"], 12);
        assert_eq!(b["context"], 8);
        assert_eq!(b["total"], 70);
    }

    #[test]
    fn find_remove_and_reset() {
        let (_, reg) = registry();
        let a = reg.create_simple("EURUSD", "MA_CROSS", "H4", "");
        reg.create_simple("GBPUSD", "MA_CROSS", "H4", "");
        assert_eq!(reg.find("EURUSD", "H4", "MA_CROSS").unwrap().id, a.id);
        assert!(reg.find("EURUSD", "H1", "MA_CROSS").is_none());
        assert_eq!(reg.remove(&a.id).unwrap().id, a.id);
        assert_eq!(reg.len(), 1);
        reg.reset();
        assert!(reg.is_empty());
    }

    fn sweep_request(confirmations: usize) -> SmartAlertRequest {
        SmartAlertRequest {
            pair: "EURUSD".into(),
            timeframe: "H1".into(),
            primary_event: "LIQUIDITY_SWEEP".into(),
            confirmations: (0..confirmations).map(|i| format!("C{i}")).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn find_or_create_reuses_and_rescores() {
        let (_, reg) = registry();
        let first = reg.find_or_create_smart(sweep_request(0));
        assert_eq!(first.confidence_score, 55);

        let again = reg.find_or_create_smart(sweep_request(2));
        assert_eq!(again.id, first.id);
        assert_eq!(again.confidence_score, 79);
        assert_eq!(reg.get(&first.id).unwrap().confidence_score, 79);
        assert_eq!(reg.len(), 1);

        let other_tf = reg.find_or_create_smart(SmartAlertRequest {
            timeframe: "M15".into(),
            ..sweep_request(0)
        });
        assert_ne!(other_tf.id, first.id);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn concurrent_find_or_create_yields_one_node_and_one_trigger() {
        for _ in 0..50 {
            let (_, reg) = registry();
            let reg = Arc::new(reg);
            let barrier = Arc::new(std::sync::Barrier::new(8));
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let reg = reg.clone();
                    let barrier = barrier.clone();
                    std::thread::spawn(move || {
                        barrier.wait();
                        let node = reg.find_or_create_smart(sweep_request(1));
                        reg.trigger(&node.id)
                    })
                })
                .collect();
            let fired = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|fired| *fired)
                .count();
            assert_eq!(reg.len(), 1);
            assert_eq!(fired, 1);
        }
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        let (_, reg) = registry();
        let reg = Arc::new(reg);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let reg = reg.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        reg.create_simple(&format!("PAIR{t}"), "RSI_LEVEL", "H1", "");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.len(), 100);
    }
}
