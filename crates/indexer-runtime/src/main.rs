//! DiamondScope indexer entry point.
//!
//! Usage: `indexer-runtime [config.json]`

use std::path::Path;

use anyhow::Context;
use tracing::info;

use ds_01_routing_index::ports::RoutingIndexApi;
use ds_telemetry::{init_telemetry, TelemetryConfig};
use indexer_runtime::{config::RuntimeConfig, snapshot, transport, wiring};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = RuntimeConfig::load(config_path.as_deref())?;

    let _guard = init_telemetry(&TelemetryConfig::from_env())?;
    info!(event_log = %config.event_log, "starting indexer run");

    let wiring = wiring::build(&config);
    let report = transport::replay_file(Path::new(&config.event_log), &wiring).await?;

    let stats = wiring.engine.stats();
    info!(
        events_processed = stats.events_processed,
        mutations_recorded = stats.mutations_recorded,
        duplicates_skipped = stats.duplicates_skipped,
        entries_skipped = stats.entries_skipped,
        registry_misses = stats.registry_misses,
        instances_synthesized = stats.instances_synthesized,
        "run complete"
    );

    let views = snapshot::export(&wiring, &report.diamonds)?;
    let rendered = serde_json::to_string_pretty(&views).context("rendering snapshot")?;
    match &config.snapshot_out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing snapshot to {path}"))?;
            info!(snapshot = %path, diamonds = views.len(), "snapshot written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
