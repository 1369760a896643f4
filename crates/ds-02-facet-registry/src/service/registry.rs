//! Registry mirror service.
//!
//! Transcribes facet-registration events into `FacetModule` records and
//! serves lookups. Re-registration refreshes every published field; a
//! malformed declared-selector packing drops only the selector list and is
//! logged, since the name/version are still worth mirroring.

use std::sync::Arc;

use tracing::{debug, warn};

use shared_types::{address_hex, decode_packed, Address, FacetMetadata, Selector};

use crate::domain::{FacetModule, MirrorError};
use crate::events::FacetRegistered;
use crate::ports::{FacetModuleStore, FacetRegistryApi};

/// The registry mirror, implemented over a facet-module store.
pub struct FacetRegistryService {
    store: Arc<dyn FacetModuleStore>,
}

impl FacetRegistryService {
    /// Build the service over the given store.
    pub fn new(store: Arc<dyn FacetModuleStore>) -> Self {
        Self { store }
    }
}

impl FacetRegistryApi for FacetRegistryService {
    fn on_facet_registered(&self, event: FacetRegistered) -> Result<(), MirrorError> {
        let declared = match decode_packed(&event.selectors_packed) {
            Ok(selectors) => selectors,
            Err(err) => {
                warn!(
                    facet = %address_hex(&event.facet),
                    error = %err,
                    "registration carried malformed selector packing; keeping name/version only"
                );
                Vec::new()
            }
        };

        self.store.put(FacetModule {
            address: event.facet,
            name: Some(event.name),
            version: Some(event.version),
            declared_selectors: declared,
            registered_at: event.meta.timestamp,
            registered_tx: event.meta.tx,
        })?;

        debug!(
            facet = %address_hex(&event.facet),
            "facet registration mirrored"
        );
        Ok(())
    }

    fn lookup(&self, facet: &Address) -> Result<Option<FacetMetadata>, MirrorError> {
        Ok(self.store.get(facet)?.and_then(|module| module.metadata()))
    }

    fn declared_selectors(&self, facet: &Address) -> Result<Option<Vec<Selector>>, MirrorError> {
        Ok(self.store.get(facet)?.map(|module| module.declared_selectors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryFacetModuleStore;
    use shared_types::{EventMeta, OrderingKey, Selector};

    fn meta(block: u64) -> EventMeta {
        EventMeta::new(1_000 + block, [block as u8; 32], OrderingKey::new(block, 0, 0))
    }

    fn service() -> FacetRegistryService {
        FacetRegistryService::new(Arc::new(InMemoryFacetModuleStore::new()))
    }

    #[test]
    fn test_registration_then_lookup() {
        let svc = service();
        svc.on_facet_registered(FacetRegistered {
            facet: [1u8; 20],
            name: "TreasuryFacet".to_string(),
            version: "3.1.0".to_string(),
            selectors_packed: vec![0x01, 0x02, 0x03, 0x04],
            meta: meta(1),
        })
        .unwrap();

        let metadata = svc.lookup(&[1u8; 20]).unwrap().unwrap();
        assert_eq!(metadata.name, "TreasuryFacet");
        assert_eq!(metadata.version, "3.1.0");

        let declared = svc.declared_selectors(&[1u8; 20]).unwrap().unwrap();
        assert_eq!(declared, vec![Selector([0x01, 0x02, 0x03, 0x04])]);
    }

    #[test]
    fn test_unknown_facet_is_none_not_error() {
        let svc = service();
        assert!(svc.lookup(&[9u8; 20]).unwrap().is_none());
        assert!(svc.declared_selectors(&[9u8; 20]).unwrap().is_none());
    }

    #[test]
    fn test_reregistration_refreshes_fields() {
        let svc = service();
        let facet = [1u8; 20];

        for (version, block) in [("1.0.0", 1), ("2.0.0", 2)] {
            svc.on_facet_registered(FacetRegistered {
                facet,
                name: "GovernanceFacet".to_string(),
                version: version.to_string(),
                selectors_packed: vec![],
                meta: meta(block),
            })
            .unwrap();
        }

        let metadata = svc.lookup(&facet).unwrap().unwrap();
        assert_eq!(metadata.version, "2.0.0");
    }

    #[test]
    fn test_malformed_selectors_keep_name_and_version() {
        let svc = service();
        svc.on_facet_registered(FacetRegistered {
            facet: [1u8; 20],
            name: "BrokenFacet".to_string(),
            version: "0.1.0".to_string(),
            selectors_packed: vec![0x01, 0x02, 0x03], // not a multiple of 4
            meta: meta(1),
        })
        .unwrap();

        assert!(svc.lookup(&[1u8; 20]).unwrap().is_some());
        assert_eq!(svc.declared_selectors(&[1u8; 20]).unwrap().unwrap(), vec![]);
    }
}
