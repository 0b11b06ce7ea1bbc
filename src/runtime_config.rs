// =============================================================================
// Runtime Configuration — engine settings with atomic save
// =============================================================================
//
// Every tunable of the evaluation loop lives here. Classifier thresholds are
// fixed constants in their modules.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_pairs() -> Vec<String> {
    vec![
        "EURUSD".to_string(),
        "GBPUSD".to_string(),
        "USDJPY".to_string(),
        "XAUUSD".to_string(),
    ]
}

fn default_timeframe() -> String {
    "H1".to_string()
}

fn default_bars_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_evaluation_interval_secs() -> u64 {
    60
}

fn default_bar_buffer_capacity() -> usize {
    500
}

fn default_analysis_window() -> usize {
    100
}

fn default_min_alert_confidence() -> u8 {
    50
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the evaluation loop.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Pairs evaluated on every tick.
    #[serde(default = "default_pairs")]
    pub pairs: Vec<String>,

    /// Timeframe label of the bar files, e.g. `H1`.
    #[serde(default = "default_timeframe")]
    pub timeframe: String,

    /// Directory holding `<PAIR>_<TIMEFRAME>.json` bar files.
    #[serde(default = "default_bars_dir")]
    pub bars_dir: PathBuf,

    #[serde(default = "default_evaluation_interval_secs")]
    pub evaluation_interval_secs: u64,

    /// Bars retained per series.
    #[serde(default = "default_bar_buffer_capacity")]
    pub bar_buffer_capacity: usize,

    /// Trailing bars handed to the classifiers. 100 covers the widest window.
    #[serde(default = "default_analysis_window")]
    pub analysis_window: usize,

    /// Smart-alert candidates scoring below this are rejected.
    #[serde(default = "default_min_alert_confidence")]
    pub min_alert_confidence: u8,

    /// Risk-filter labels attached to every alert the monitor creates.
    #[serde(default)]
    pub risk_filters: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pairs: default_pairs(),
            timeframe: default_timeframe(),
            bars_dir: default_bars_dir(),
            evaluation_interval_secs: default_evaluation_interval_secs(),
            bar_buffer_capacity: default_bar_buffer_capacity(),
            analysis_window: default_analysis_window(),
            min_alert_confidence: default_min_alert_confidence(),
            risk_filters: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            pairs = ?config.pairs,
            timeframe = %config.timeframe,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Override pairs from a comma-separated list such as `VIGIL_PAIRS`.
    /// Blank entries are ignored; an all-blank list leaves pairs unchanged.
    pub fn apply_pairs_override(&mut self, list: &str) {
        let pairs: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !pairs.is_empty() {
            self.pairs = pairs;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.pairs.len(), 4);
        assert_eq!(cfg.pairs[0], "EURUSD");
        assert_eq!(cfg.timeframe, "H1");
        assert_eq!(cfg.analysis_window, 100);
        assert_eq!(cfg.min_alert_confidence, 50);
        assert!(cfg.risk_filters.is_empty());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.evaluation_interval_secs, 60);
        assert_eq!(cfg.bar_buffer_capacity, 500);
        assert_eq!(cfg.bars_dir, PathBuf::from("data"));
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "timeframe": "M15", "pairs": ["XAUUSD"] }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.timeframe, "M15");
        assert_eq!(cfg.pairs, vec!["XAUUSD"]);
        assert_eq!(cfg.min_alert_confidence, 50);
    }

    #[test]
    fn pairs_override_normalises_input() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_pairs_override(" eurusd, ,gbpjpy ");
        assert_eq!(cfg.pairs, vec!["EURUSD", "GBPJPY"]);
        cfg.apply_pairs_override(" , ");
        assert_eq!(cfg.pairs, vec!["EURUSD", "GBPJPY"]);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("vigil-cfg-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vigil_config.json");

        let mut cfg = RuntimeConfig::default();
        cfg.min_alert_confidence = 65;
        cfg.save(&path).unwrap();
        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.min_alert_confidence, 65);
        assert!(!path.with_extension("json.tmp").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(RuntimeConfig::load("/definitely/not/here.json").is_err());
    }
}
