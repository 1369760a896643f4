//! # Event Payloads

use serde::{Deserialize, Serialize};
use shared_types::{Address, EventMeta};

/// A facet publishing (or re-publishing) its name, version, and declared
/// selector list to the on-chain registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRegistered {
    /// The facet implementation address.
    pub facet: Address,
    /// Published display name.
    pub name: String,
    /// Published version string.
    pub version: String,
    /// Packed declared selectors (`N * 4` bytes).
    #[serde(with = "shared_types::selector::packed_hex")]
    pub selectors_packed: Vec<u8>,
    /// Transport metadata.
    pub meta: EventMeta,
}
