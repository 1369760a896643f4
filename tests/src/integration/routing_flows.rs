//! # Cross-Subsystem Routing Flows
//!
//! Drives the routing index (ds-01) and the facet registry mirror (ds-02)
//! together, the way the runtime wires them: registration events feed the
//! mirror, mutation events feed the index, and the index resolves facet
//! metadata through a bridge onto the mirror.

// =============================================================================
// TEST FIXTURES (only compiled during tests)
// =============================================================================

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use ds_01_routing_index::adapters::{
    InMemoryAuditLog, InMemoryDiamondStore, InMemoryInstallationStore, InMemorySelectorIndex,
};
#[cfg(test)]
use ds_01_routing_index::domain::RegistryError;
#[cfg(test)]
use ds_01_routing_index::events::{CutEntry, DiamondCut, SelectorRemoved, SelectorReplaced};
#[cfg(test)]
use ds_01_routing_index::ports::{FacetMetadataSource, RoutingIndexApi};
#[cfg(test)]
use ds_01_routing_index::Reconciler;
#[cfg(test)]
use ds_02_facet_registry::adapters::InMemoryFacetModuleStore;
#[cfg(test)]
use ds_02_facet_registry::events::FacetRegistered;
#[cfg(test)]
use ds_02_facet_registry::ports::FacetRegistryApi;
#[cfg(test)]
use ds_02_facet_registry::FacetRegistryService;
#[cfg(test)]
use shared_types::{Address, EventMeta, FacetMetadata, OrderingKey, Selector};

/// The same bridge shape the runtime uses: the index's lookup port
/// implemented over the mirror service.
#[cfg(test)]
struct MirrorBridge {
    registry: Arc<FacetRegistryService>,
}

#[cfg(test)]
#[async_trait]
impl FacetMetadataSource for MirrorBridge {
    async fn lookup(&self, facet: &Address) -> Result<Option<FacetMetadata>, RegistryError> {
        self.registry
            .lookup(facet)
            .map_err(|err| RegistryError::Unavailable(err.to_string()))
    }
}

#[cfg(test)]
struct Harness {
    registry: Arc<FacetRegistryService>,
    engine: Reconciler,
}

#[cfg(test)]
impl Harness {
    fn new() -> Self {
        let registry = Arc::new(FacetRegistryService::new(Arc::new(
            InMemoryFacetModuleStore::new(),
        )));
        let engine = Reconciler::new(
            Arc::new(InMemoryDiamondStore::new()),
            Arc::new(InMemoryInstallationStore::new()),
            Arc::new(InMemorySelectorIndex::new()),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(MirrorBridge {
                registry: registry.clone(),
            }),
        );
        Self { registry, engine }
    }
}

#[cfg(test)]
fn meta(block: u64) -> EventMeta {
    EventMeta::new(1_000 + block, [block as u8; 32], OrderingKey::new(block, 0, 0))
}

#[cfg(test)]
fn sel(b: u8) -> Selector {
    Selector([b, 0, 0, 0])
}

#[cfg(test)]
fn packed(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|b| vec![*b, 0, 0, 0]).collect()
}

#[cfg(test)]
fn add_cut(diamond: Address, facet: Address, selector_bytes: &[u8], block: u64) -> DiamondCut {
    DiamondCut {
        diamond,
        entries: vec![CutEntry {
            facet,
            action_code: 0,
            selectors_packed: packed(selector_bytes),
        }],
        init_facet: None,
        init_calldata: None,
        meta: meta(block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAMOND: Address = [0xD1; 20];
    const OTHER_DIAMOND: Address = [0xD2; 20];
    const FACET_A: Address = [0xA1; 20];
    const FACET_B: Address = [0xB1; 20];

    /// Install, replace away, close on last removal, reactivate: the full
    /// lifecycle, with metadata resolved through the mirror.
    #[tokio::test]
    async fn test_lifecycle_with_registry_enrichment() {
        let h = Harness::new();

        h.registry
            .on_facet_registered(FacetRegistered {
                facet: FACET_A,
                name: "AccessControlFacet".to_string(),
                version: "1.4.2".to_string(),
                selectors_packed: packed(&[0x01, 0x02]),
                meta: meta(1),
            })
            .unwrap();

        h.engine
            .on_diamond_cut(add_cut(DIAMOND, FACET_A, &[0x01, 0x02], 2))
            .await
            .unwrap();

        let installations = h.engine.installations(&DIAMOND).unwrap();
        let installed = &installations[0];
        assert_eq!(installed.facet_name.as_deref(), Some("AccessControlFacet"));
        assert_eq!(installed.facet_version.as_deref(), Some("1.4.2"));
        assert_eq!(installed.selector_hex(), vec!["0x01000000", "0x02000000"]);

        h.engine
            .on_selector_replaced(SelectorReplaced {
                diamond: DIAMOND,
                selector: sel(0x01),
                new_facet: FACET_B,
                meta: meta(3),
            })
            .await
            .unwrap();
        h.engine
            .on_selector_removed(SelectorRemoved {
                diamond: DIAMOND,
                selector: sel(0x02),
                meta: meta(4),
            })
            .await
            .unwrap();

        let a = h
            .engine
            .installations(&DIAMOND)
            .unwrap()
            .into_iter()
            .find(|inst| inst.facet == FACET_A)
            .unwrap();
        assert!(!a.active);

        h.engine
            .on_diamond_cut(add_cut(DIAMOND, FACET_A, &[0x02], 5))
            .await
            .unwrap();

        let reopened = h
            .engine
            .installations(&DIAMOND)
            .unwrap()
            .into_iter()
            .find(|inst| inst.facet == FACET_A)
            .unwrap();
        assert!(reopened.active);
        assert_eq!(reopened.first_installed_at, 1_002);
        // Cached metadata survived the close/reopen cycle
        assert_eq!(reopened.facet_name.as_deref(), Some("AccessControlFacet"));
    }

    /// The whole log redelivered from the start is absorbed without any
    /// state change: at-least-once transports are safe.
    #[tokio::test]
    async fn test_full_log_redelivery_is_absorbed() {
        let h = Harness::new();
        let log = [
            add_cut(DIAMOND, FACET_A, &[0x01, 0x02], 1),
            add_cut(DIAMOND, FACET_B, &[0x03], 2),
        ];

        for event in &log {
            h.engine.on_diamond_cut(event.clone()).await.unwrap();
        }
        let installations = h.engine.installations(&DIAMOND).unwrap();
        let trail = h.engine.mutations(&DIAMOND).unwrap();

        for event in &log {
            let outcome = h.engine.on_diamond_cut(event.clone()).await.unwrap();
            assert!(!outcome.applied);
        }
        assert_eq!(h.engine.installations(&DIAMOND).unwrap(), installations);
        assert_eq!(h.engine.mutations(&DIAMOND).unwrap(), trail);
    }

    /// Diamonds are independent: interleaved events never leak ownership
    /// across instances.
    #[tokio::test]
    async fn test_diamonds_are_isolated() {
        let h = Harness::new();

        h.engine
            .on_diamond_cut(add_cut(DIAMOND, FACET_A, &[0x01], 1))
            .await
            .unwrap();
        h.engine
            .on_diamond_cut(add_cut(OTHER_DIAMOND, FACET_B, &[0x01], 2))
            .await
            .unwrap();

        assert_eq!(h.engine.owner_of(&DIAMOND, sel(0x01)).unwrap(), Some(FACET_A));
        assert_eq!(
            h.engine.owner_of(&OTHER_DIAMOND, sel(0x01)).unwrap(),
            Some(FACET_B)
        );

        // Removing on one diamond leaves the other untouched
        h.engine
            .on_selector_removed(SelectorRemoved {
                diamond: DIAMOND,
                selector: sel(0x01),
                meta: meta(3),
            })
            .await
            .unwrap();
        assert_eq!(h.engine.owner_of(&DIAMOND, sel(0x01)).unwrap(), None);
        assert_eq!(
            h.engine.owner_of(&OTHER_DIAMOND, sel(0x01)).unwrap(),
            Some(FACET_B)
        );
    }

    /// A facet that registers after installation gets its metadata on the
    /// next mutation touching it; no negative caching in between.
    #[tokio::test]
    async fn test_late_registration_resolves_through_bridge() {
        let h = Harness::new();

        h.engine
            .on_diamond_cut(add_cut(DIAMOND, FACET_A, &[0x01], 1))
            .await
            .unwrap();
        assert!(h.engine.installations(&DIAMOND).unwrap()[0]
            .facet_name
            .is_none());

        h.registry
            .on_facet_registered(FacetRegistered {
                facet: FACET_A,
                name: "LateFacet".to_string(),
                version: "0.2.0".to_string(),
                selectors_packed: vec![],
                meta: meta(2),
            })
            .unwrap();

        h.engine
            .on_diamond_cut(add_cut(DIAMOND, FACET_A, &[0x02], 3))
            .await
            .unwrap();
        assert_eq!(
            h.engine.installations(&DIAMOND).unwrap()[0]
                .facet_name
                .as_deref(),
            Some("LateFacet")
        );
    }

    /// Declared selectors in the mirror are reference data, independent of
    /// what a diamond actually has installed.
    #[tokio::test]
    async fn test_declared_selectors_do_not_drive_routing() {
        let h = Harness::new();

        h.registry
            .on_facet_registered(FacetRegistered {
                facet: FACET_A,
                name: "WideFacet".to_string(),
                version: "1.0.0".to_string(),
                selectors_packed: packed(&[0x01, 0x02, 0x03, 0x04]),
                meta: meta(1),
            })
            .unwrap();

        // Only one of the four declared selectors is actually installed
        h.engine
            .on_diamond_cut(add_cut(DIAMOND, FACET_A, &[0x01], 2))
            .await
            .unwrap();

        assert_eq!(
            h.registry.declared_selectors(&FACET_A).unwrap().unwrap().len(),
            4
        );
        assert_eq!(
            h.engine.installations(&DIAMOND).unwrap()[0].selectors.len(),
            1
        );
    }
}
