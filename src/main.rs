// =============================================================================
// Vigil Engine — Evaluation Loop Entry Point
// =============================================================================
//
// Loads bar files for every configured pair, then re-evaluates each pair on a
// fixed interval: classifier fan-out, confluence score, alert decision.
// Bar files are re-read on every tick so an external writer can append bars.
// =============================================================================

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vigil_engine::market_data::bar_buffer::feed_from_dir;
use vigil_engine::market_data::BarKey;
use vigil_engine::vigilance::MonitorDecision;
use vigil_engine::{EngineState, RuntimeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Vigil Engine starting up");

    let config_path =
        std::env::var("VIGIL_CONFIG").unwrap_or_else(|_| "vigil_config.json".into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(list) = std::env::var("VIGIL_PAIRS") {
        config.apply_pairs_override(&list);
    }

    info!(
        pairs = ?config.pairs,
        timeframe = %config.timeframe,
        bars_dir = %config.bars_dir.display(),
        interval_secs = config.evaluation_interval_secs,
        "Configured evaluation"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(EngineState::new(config));

    // ── 3. Evaluation loop ───────────────────────────────────────────────
    let loop_state = state.clone();
    tokio::spawn(async move {
        let secs = loop_state
            .runtime_config
            .read()
            .evaluation_interval_secs
            .max(1);
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(secs));
        loop {
            interval.tick().await;
            refresh_bars(&loop_state);

            for eval in loop_state.evaluate_all() {
                let a = &eval.analysis;
                info!(
                    pair = %a.pair,
                    bias = %a.structure.bias,
                    event = %a.structure.event,
                    trend = %a.trend.strength,
                    volatility = %a.trend.volatility,
                    score = a.score(),
                    zones = a.zones.len(),
                    levels = a.levels.len(),
                    "analysis"
                );
                match &eval.decision {
                    MonitorDecision::Triggered { node_id, trigger, confidence } => {
                        info!(pair = %a.pair, node_id = %node_id, trigger = %trigger, confidence, "ALERT");
                    }
                    MonitorDecision::Rejected { trigger, reason, .. } => {
                        info!(pair = %a.pair, trigger = %trigger, reason = %reason, "alert rejected");
                    }
                    other => {
                        tracing::debug!(pair = %a.pair, decision = ?other, "no alert");
                    }
                }
            }
        }
    });

    info!("Evaluation loop running. Press Ctrl+C to stop.");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");

    match serde_json::to_string_pretty(&state.build_snapshot()) {
        Ok(json) => info!(snapshot = %json, "final engine snapshot"),
        Err(e) => error!(error = %e, "Failed to serialise final snapshot"),
    }

    if let Err(e) = state.runtime_config.read().save(&config_path) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("Vigil Engine shut down complete.");
    Ok(())
}

/// Re-read every configured bar file into the buffer. Missing or unreadable
/// files are logged and skipped.
fn refresh_bars(state: &EngineState) {
    let (pairs, timeframe, dir) = {
        let config = state.runtime_config.read();
        (
            config.pairs.clone(),
            config.timeframe.clone(),
            config.bars_dir.clone(),
        )
    };
    for pair in pairs {
        let key = BarKey::new(pair, &timeframe);
        if let Err(e) = feed_from_dir(&state.bar_buffer, &dir, &key) {
            warn!(key = %key, error = %e, "bar refresh failed");
        }
    }
}
