//! # Outbound Ports (Driven Ports)

use shared_types::{Address, StoreError};

use crate::domain::FacetModule;

/// Store for registered facet records, keyed by facet address.
pub trait FacetModuleStore: Send + Sync {
    /// Load a facet record.
    fn get(&self, facet: &Address) -> Result<Option<FacetModule>, StoreError>;

    /// Save a facet record.
    fn put(&self, module: FacetModule) -> Result<(), StoreError>;
}
