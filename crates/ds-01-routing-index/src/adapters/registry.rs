//! Static registry adapter.
//!
//! Serves metadata from an in-memory table. Entries can be inserted while
//! the adapter is live, which is how tests model a registry that learns
//! about a facet after the routing index has already seen it.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use shared_types::{Address, FacetMetadata};

use crate::domain::RegistryError;
use crate::ports::FacetMetadataSource;

/// `FacetMetadataSource` backed by a mutable in-memory table.
#[derive(Default)]
pub struct StaticMetadataSource {
    entries: RwLock<HashMap<Address, FacetMetadata>>,
}

impl StaticMetadataSource {
    /// An empty source: every lookup resolves to "not registered".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a source from known entries.
    pub fn new(entries: impl IntoIterator<Item = (Address, FacetMetadata)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Register or refresh one facet's metadata.
    pub fn insert(&self, facet: Address, metadata: FacetMetadata) {
        self.entries.write().insert(facet, metadata);
    }
}

#[async_trait]
impl FacetMetadataSource for StaticMetadataSource {
    async fn lookup(&self, facet: &Address) -> Result<Option<FacetMetadata>, RegistryError> {
        Ok(self.entries.read().get(facet).cloned())
    }
}
