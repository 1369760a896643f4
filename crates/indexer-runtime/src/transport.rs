//! File-based replay transport.
//!
//! Reads a JSON-lines event log (one event per line, in source order) and
//! drives the wired subsystems with it. This is the development stand-in
//! for a live block-log subscription; it honors the same contract the live
//! transport would: events arrive in total order, and an ordering
//! violation reported by the engine aborts the run loudly.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ds_01_routing_index::events::{
    DiamondCut, InstanceCreated, SelectorAdded, SelectorRemoved, SelectorReplaced,
};
use ds_01_routing_index::ports::RoutingIndexApi;
use ds_02_facet_registry::events::FacetRegistered;
use ds_02_facet_registry::ports::FacetRegistryApi;
use shared_types::Address;

use crate::wiring::Wiring;

/// One line of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportEvent {
    /// Diamond factory creation.
    InstanceCreated(InstanceCreated),
    /// Facet registry registration (consumed by the mirror, not the index).
    FacetRegistered(FacetRegistered),
    /// Bulk routing-table cut.
    DiamondCut(DiamondCut),
    /// Granular selector install.
    SelectorAdded(SelectorAdded),
    /// Granular selector removal.
    SelectorRemoved(SelectorRemoved),
    /// Granular selector reassignment.
    SelectorReplaced(SelectorReplaced),
}

/// Outcome of one replay run.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Event lines successfully dispatched.
    pub events: u64,
    /// Lines that did not parse as an event (logged and skipped).
    pub malformed_lines: u64,
    /// Every diamond referenced by the log, for snapshot export.
    pub diamonds: BTreeSet<Address>,
}

/// Replay an event log file through the wired subsystems.
pub async fn replay_file(path: &Path, wiring: &Wiring) -> anyhow::Result<ReplayReport> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading event log {}", path.display()))?;

    let mut report = ReplayReport::default();

    for (line_number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: TransportEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    line = line_number + 1,
                    error = %err,
                    "skipping malformed event line"
                );
                report.malformed_lines += 1;
                continue;
            }
        };

        dispatch(wiring, &mut report, event)
            .await
            .with_context(|| format!("applying event at line {}", line_number + 1))?;
        report.events += 1;
    }

    info!(
        events = report.events,
        malformed = report.malformed_lines,
        diamonds = report.diamonds.len(),
        "event log replayed"
    );
    Ok(report)
}

async fn dispatch(
    wiring: &Wiring,
    report: &mut ReplayReport,
    event: TransportEvent,
) -> anyhow::Result<()> {
    match event {
        TransportEvent::FacetRegistered(event) => {
            wiring.registry.on_facet_registered(event)?;
        }
        TransportEvent::InstanceCreated(event) => {
            report.diamonds.insert(event.diamond);
            wiring.engine.on_instance_created(event).await?;
        }
        TransportEvent::DiamondCut(event) => {
            report.diamonds.insert(event.diamond);
            wiring.engine.on_diamond_cut(event).await?;
        }
        TransportEvent::SelectorAdded(event) => {
            report.diamonds.insert(event.diamond);
            wiring.engine.on_selector_added(event).await?;
        }
        TransportEvent::SelectorRemoved(event) => {
            report.diamonds.insert(event.diamond);
            wiring.engine.on_selector_removed(event).await?;
        }
        TransportEvent::SelectorReplaced(event) => {
            report.diamonds.insert(event.diamond);
            wiring.engine.on_selector_replaced(event).await?;
        }
    }
    Ok(())
}
