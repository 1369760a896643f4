//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, FacetMetadata, Hash, Selector};

/// One registered facet implementation, global across all diamonds.
///
/// Created and updated only by this subsystem's own ingestion pipeline.
/// Everything here is what the facet *publishes* about itself; whether any
/// diamond routes to it is a different subsystem's question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetModule {
    /// The facet implementation address.
    pub address: Address,
    /// Published display name.
    pub name: Option<String>,
    /// Published version string.
    pub version: Option<String>,
    /// Selectors the facet declares it implements. May be empty when the
    /// registration carried no (or malformed) selector data.
    pub declared_selectors: Vec<Selector>,
    /// Block timestamp of the latest registration.
    pub registered_at: u64,
    /// Transaction of the latest registration.
    pub registered_tx: Hash,
}

impl FacetModule {
    /// Display metadata, available once both published fields are known.
    pub fn metadata(&self) -> Option<FacetMetadata> {
        match (&self.name, &self.version) {
            (Some(name), Some(version)) => Some(FacetMetadata {
                name: name.clone(),
                version: version.clone(),
            }),
            _ => None,
        }
    }
}
