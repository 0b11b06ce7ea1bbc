// =============================================================================
// Vigilance Module
// =============================================================================
//
// Alert-creation path of the pipeline:
// - Base-score tables, smart/simple scoring and strength tiers
// - Vigilance nodes with their cooldown gate
// - Registry, rejection log and audit archive (each behind one mutex)
// - Monitor that turns a market analysis into an alert decision

pub mod audit;
pub mod monitor;
pub mod node;
pub mod registry;
pub mod rejections;
pub mod scoring;

pub use audit::{AuditArchive, AuditOutcome, AuditRecord};
pub use monitor::{MonitorDecision, VigilanceMonitor};
pub use node::{AlertType, SmartAlertRequest, VigilanceNode};
pub use registry::VigilanceRegistry;
pub use rejections::{RejectedPattern, RejectionLog};
pub use scoring::{AlertScore, AlertStrength, SimpleTrigger, SmartEvent};
