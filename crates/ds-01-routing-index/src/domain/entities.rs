//! # Domain Entities
//!
//! Core entities for the Routing Table Index subsystem: tracked diamonds,
//! facet installations, reverse selector ownership, and the audit record.

use serde::{Deserialize, Serialize};
use shared_types::{Address, EventMeta, Hash, OrderingKey, Selector};

use super::value_objects::{CutAction, UNKNOWN_CLASSIFICATION};

/// A tracked diamond proxy: the owner of one routing table.
///
/// Created either by an explicit factory creation event, or synthesized
/// lazily when a mutation event references a diamond this subsystem has
/// never seen. The `synthesized` flag records that provenance so a later
/// authoritative creation can be distinguished from an inferred placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diamond {
    /// Address of the proxy contract.
    pub address: Address,
    /// Block timestamp of first observation.
    pub created_at: u64,
    /// Transaction of first observation.
    pub created_tx: Hash,
    /// Deployer, when an explicit creation event supplied it.
    pub creator: Option<Address>,
    /// Classification tag assigned by external initialization handlers.
    /// Opaque to this subsystem; starts as the `"unknown"` placeholder.
    pub classification: String,
    /// True when this record was synthesized on first reference rather
    /// than created by an explicit creation event.
    pub synthesized: bool,
}

impl Diamond {
    /// Create an authoritative record from an explicit creation event.
    pub fn created(address: Address, creator: Address, meta: &EventMeta) -> Self {
        Self {
            address,
            created_at: meta.timestamp,
            created_tx: meta.tx,
            creator: Some(creator),
            classification: UNKNOWN_CLASSIFICATION.to_string(),
            synthesized: false,
        }
    }

    /// Synthesize a placeholder record for a diamond first seen through a
    /// mutation event.
    pub fn observed(address: Address, meta: &EventMeta) -> Self {
        Self {
            address,
            created_at: meta.timestamp,
            created_tx: meta.tx,
            creator: None,
            classification: UNKNOWN_CLASSIFICATION.to_string(),
            synthesized: true,
        }
    }

    /// Upgrade a synthesized placeholder with the authoritative creation
    /// event that arrived after it. The classification is left untouched.
    pub fn confirm_created(&mut self, creator: Address, meta: &EventMeta) {
        self.creator = Some(creator);
        self.created_at = meta.timestamp;
        self.created_tx = meta.tx;
        self.synthesized = false;
    }

    /// Apply a classification observed by an external initializer.
    ///
    /// The placeholder tag never overwrites a known classification: setting
    /// `"unknown"` over a real tag is ignored. Returns whether the tag
    /// changed.
    pub fn classify(&mut self, tag: &str) -> bool {
        if tag == UNKNOWN_CLASSIFICATION && self.classification != UNKNOWN_CLASSIFICATION {
            return false;
        }
        if self.classification == tag {
            return false;
        }
        self.classification = tag.to_string();
        true
    }
}

/// The record of one facet's selector ownership on one diamond.
///
/// Identity is the (diamond, facet) pair and survives removal: when the
/// last selector leaves, the installation closes in place (inactive,
/// selectors cleared) and a later re-add reactivates the same record. The
/// `first_installed_*` fields never change after creation, so historical
/// continuity stays inspectable across reactivations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetInstallation {
    /// Diamond this installation belongs to.
    pub diamond: Address,
    /// The facet implementation address.
    pub facet: Address,
    /// Selectors currently routed to this facet, in installation order.
    /// While active this is exactly the set of selectors whose reverse
    /// index entry names this facet.
    pub selectors: Vec<Selector>,
    /// Whether the facet currently owns any selectors.
    pub active: bool,
    /// Timestamp of the first installation ever. Never changes.
    pub first_installed_at: u64,
    /// Transaction of the first installation ever. Never changes.
    pub first_installed_tx: Hash,
    /// Timestamp of the current activation.
    pub activated_at: u64,
    /// Transaction of the current activation.
    pub activated_tx: Hash,
    /// Timestamp of the last mutation touching this installation.
    pub last_updated_at: u64,
    /// Transaction of the last mutation touching this installation.
    pub last_updated_tx: Hash,
    /// Timestamp of closure; `None` while active.
    pub removed_at: Option<u64>,
    /// Transaction of closure; `None` while active.
    pub removed_tx: Option<Hash>,
    /// Cached facet name from the registry, refreshed opportunistically.
    pub facet_name: Option<String>,
    /// Cached facet version from the registry, refreshed opportunistically.
    pub facet_version: Option<String>,
}

impl FacetInstallation {
    /// Open a new installation with an empty selector set.
    pub fn install(diamond: Address, facet: Address, meta: &EventMeta) -> Self {
        Self {
            diamond,
            facet,
            selectors: Vec::new(),
            active: true,
            first_installed_at: meta.timestamp,
            first_installed_tx: meta.tx,
            activated_at: meta.timestamp,
            activated_tx: meta.tx,
            last_updated_at: meta.timestamp,
            last_updated_tx: meta.tx,
            removed_at: None,
            removed_tx: None,
            facet_name: None,
            facet_version: None,
        }
    }

    /// Reopen a closed installation, reusing its identity. The
    /// `first_installed_*` fields are preserved.
    pub fn reactivate(&mut self, meta: &EventMeta) {
        self.active = true;
        self.activated_at = meta.timestamp;
        self.activated_tx = meta.tx;
        self.last_updated_at = meta.timestamp;
        self.last_updated_tx = meta.tx;
        self.removed_at = None;
        self.removed_tx = None;
        self.selectors.clear();
    }

    /// Append a selector to the owned set. Returns false if it was already
    /// present.
    pub fn add_selector(&mut self, selector: Selector, meta: &EventMeta) -> bool {
        if self.selectors.contains(&selector) {
            return false;
        }
        self.selectors.push(selector);
        self.last_updated_at = meta.timestamp;
        self.last_updated_tx = meta.tx;
        true
    }

    /// Remove a selector from the owned set. Returns false if it was not
    /// present. Does not close the installation; callers decide that once
    /// they see the set empty.
    pub fn remove_selector(&mut self, selector: Selector, meta: &EventMeta) -> bool {
        let before = self.selectors.len();
        self.selectors.retain(|s| *s != selector);
        if self.selectors.len() == before {
            return false;
        }
        self.last_updated_at = meta.timestamp;
        self.last_updated_tx = meta.tx;
        true
    }

    /// Whether this installation currently lists the selector.
    pub fn contains(&self, selector: Selector) -> bool {
        self.selectors.contains(&selector)
    }

    /// Close the installation: inactive with an empty selector set.
    pub fn close(&mut self, meta: &EventMeta) {
        self.active = false;
        self.selectors.clear();
        self.last_updated_at = meta.timestamp;
        self.last_updated_tx = meta.tx;
        self.removed_at = Some(meta.timestamp);
        self.removed_tx = Some(meta.tx);
    }

    /// Canonical text rendering of the owned selectors, in order.
    pub fn selector_hex(&self) -> Vec<String> {
        self.selectors.iter().map(|s| s.to_hex()).collect()
    }
}

/// Reverse selector index entry: the authoritative current owner of one
/// selector on one diamond.
///
/// `FacetInstallation.selectors` is a denormalized view of these entries
/// and must always agree with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOwnership {
    /// Diamond the selector lives on.
    pub diamond: Address,
    /// The selector.
    pub selector: Selector,
    /// Current owning facet; `None` while unowned.
    pub owner: Option<Address>,
    /// Timestamp of the last ownership change.
    pub changed_at: u64,
    /// Transaction of the last ownership change.
    pub changed_tx: Hash,
}

/// One immutable audit record per processed elementary change.
///
/// Records are never updated or deleted. `key` plus the two sub-indices
/// give a stable total order for replay: all records of one event share its
/// ordering key and are sub-ordered by cut entry, then selector position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorMutation {
    /// Diamond the mutation applies to.
    pub diamond: Address,
    /// The selector touched.
    pub selector: Selector,
    /// Elementary action kind.
    pub action: CutAction,
    /// Facet involved: the new owner for ADD/REPLACE, the resolved prior
    /// owner for REMOVE, `None` when a removal could not be attributed.
    pub facet: Option<Address>,
    /// Initializer facet of the enclosing bulk cut, when one was given.
    pub initiator: Option<Address>,
    /// Block timestamp of the event.
    pub timestamp: u64,
    /// Transaction that emitted the event.
    pub tx: Hash,
    /// Total-order position of the enclosing event.
    pub key: OrderingKey,
    /// Index of the cut entry within the event.
    pub entry_index: u32,
    /// Index of the selector within the cut entry.
    pub selector_index: u32,
}
