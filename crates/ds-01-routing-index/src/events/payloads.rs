//! # Event Payloads
//!
//! Inbound payload types, one per transport event variant. Every payload
//! carries `EventMeta` (timestamp, transaction, ordering key); nothing else
//! duplicates ordering information.
//!
//! Variants differ deliberately in how much they say: the granular removal
//! event names only the selector. Upstream emitters do not know (or do not
//! report) the owner being removed, which is why the engine resolves prior
//! ownership from its reverse index and never from a payload.

use serde::{Deserialize, Serialize};
use shared_types::{Address, EventMeta, Selector};

/// Explicit diamond creation from the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceCreated {
    /// The new diamond's address.
    pub diamond: Address,
    /// The deploying account.
    pub creator: Address,
    /// Transport metadata.
    pub meta: EventMeta,
}

/// One entry of a bulk cut: a facet, an action code, and the packed
/// selector list the action applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutEntry {
    /// Facet the entry targets. For REMOVE entries emitters routinely set
    /// this to the zero address; it is ignored in favor of the reverse
    /// index either way.
    pub facet: Address,
    /// Numeric action code, decoded via `CutAction::from_code`.
    pub action_code: u8,
    /// Packed selector bytes (`N * 4`), decoded via the selector codec.
    #[serde(with = "shared_types::selector::packed_hex")]
    pub selectors_packed: Vec<u8>,
}

/// A bulk routing-table cut: many entries applied atomically on chain,
/// delivered here as one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiamondCut {
    /// Diamond the cut applies to.
    pub diamond: Address,
    /// Cut entries, in on-chain array order. Later entries may legitimately
    /// re-touch selectors touched by earlier entries of the same cut.
    pub entries: Vec<CutEntry>,
    /// Initializer facet invoked by the cut, when one was given.
    pub init_facet: Option<Address>,
    /// Initializer calldata, opaque to this subsystem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_calldata: Option<Vec<u8>>,
    /// Transport metadata.
    pub meta: EventMeta,
}

/// Granular single-selector install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorAdded {
    /// Diamond the selector lives on.
    pub diamond: Address,
    /// The selector installed.
    pub selector: Selector,
    /// The facet now owning it.
    pub facet: Address,
    /// Transport metadata.
    pub meta: EventMeta,
}

/// Granular single-selector removal.
///
/// There is no facet field: this event variant never reports the prior
/// owner. The engine resolves it from the reverse selector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorRemoved {
    /// Diamond the selector lives on.
    pub diamond: Address,
    /// The selector removed.
    pub selector: Selector,
    /// Transport metadata.
    pub meta: EventMeta,
}

/// Granular single-selector reassignment to a new facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorReplaced {
    /// Diamond the selector lives on.
    pub diamond: Address,
    /// The selector reassigned.
    pub selector: Selector,
    /// The facet taking ownership.
    pub new_facet: Address,
    /// Transport metadata.
    pub meta: EventMeta,
}
