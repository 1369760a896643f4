//! Snapshot export.
//!
//! Renders the derived state for external readers: per diamond, the full
//! installation set (active and closed) and the ordered audit trail, with
//! addresses and selectors in their canonical hex forms.

use std::collections::BTreeSet;

use serde::Serialize;

use ds_01_routing_index::domain::{FacetInstallation, SelectorMutation};
use ds_01_routing_index::ports::{DiamondStore, RoutingIndexApi};
use shared_types::{address_hex, hash_hex, Address};

use crate::wiring::Wiring;

/// Export view of one installation.
#[derive(Debug, Serialize)]
pub struct InstallationView {
    pub facet: String,
    pub facet_name: Option<String>,
    pub facet_version: Option<String>,
    pub selectors: Vec<String>,
    pub active: bool,
    pub first_installed_at: u64,
    pub activated_at: u64,
    pub last_updated_at: u64,
    pub removed_at: Option<u64>,
}

impl From<&FacetInstallation> for InstallationView {
    fn from(inst: &FacetInstallation) -> Self {
        Self {
            facet: address_hex(&inst.facet),
            facet_name: inst.facet_name.clone(),
            facet_version: inst.facet_version.clone(),
            selectors: inst.selector_hex(),
            active: inst.active,
            first_installed_at: inst.first_installed_at,
            activated_at: inst.activated_at,
            last_updated_at: inst.last_updated_at,
            removed_at: inst.removed_at,
        }
    }
}

/// Export view of one audit record.
#[derive(Debug, Serialize)]
pub struct MutationView {
    pub action: String,
    pub selector: String,
    pub facet: Option<String>,
    pub initiator: Option<String>,
    pub timestamp: u64,
    pub tx: String,
    pub block: u64,
    pub tx_index: u32,
    pub log_index: u32,
    pub entry_index: u32,
    pub selector_index: u32,
}

impl From<&SelectorMutation> for MutationView {
    fn from(record: &SelectorMutation) -> Self {
        Self {
            action: record.action.to_string(),
            selector: record.selector.to_hex(),
            facet: record.facet.as_ref().map(address_hex),
            initiator: record.initiator.as_ref().map(address_hex),
            timestamp: record.timestamp,
            tx: hash_hex(&record.tx),
            block: record.key.block,
            tx_index: record.key.tx_index,
            log_index: record.key.log_index,
            entry_index: record.entry_index,
            selector_index: record.selector_index,
        }
    }
}

/// Export view of one diamond.
#[derive(Debug, Serialize)]
pub struct DiamondView {
    pub diamond: String,
    pub classification: String,
    pub synthesized: bool,
    pub installations: Vec<InstallationView>,
    pub mutations: Vec<MutationView>,
}

/// Build the export for every diamond the replay touched.
pub fn export(wiring: &Wiring, diamonds: &BTreeSet<Address>) -> anyhow::Result<Vec<DiamondView>> {
    let mut views = Vec::with_capacity(diamonds.len());
    for address in diamonds {
        let record = wiring.diamonds.get(address)?;
        let (classification, synthesized) = record
            .map(|d| (d.classification, d.synthesized))
            .unwrap_or_else(|| ("unknown".to_string(), true));

        let installations = wiring
            .engine
            .installations(address)?
            .iter()
            .map(InstallationView::from)
            .collect();
        let mutations = wiring
            .engine
            .mutations(address)?
            .iter()
            .map(MutationView::from)
            .collect();

        views.push(DiamondView {
            diamond: address_hex(address),
            classification,
            synthesized,
            installations,
            mutations,
        });
    }
    Ok(views)
}
