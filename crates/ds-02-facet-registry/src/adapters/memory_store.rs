//! In-memory implementation of the facet-module store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use shared_types::{Address, StoreError};

use crate::domain::FacetModule;
use crate::ports::FacetModuleStore;

/// In-memory implementation of `FacetModuleStore`.
#[derive(Default)]
pub struct InMemoryFacetModuleStore {
    modules: RwLock<BTreeMap<Address, FacetModule>>,
}

impl InMemoryFacetModuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FacetModuleStore for InMemoryFacetModuleStore {
    fn get(&self, facet: &Address) -> Result<Option<FacetModule>, StoreError> {
        Ok(self.modules.read().get(facet).cloned())
    }

    fn put(&self, module: FacetModule) -> Result<(), StoreError> {
        self.modules.write().insert(module.address, module);
        Ok(())
    }
}
