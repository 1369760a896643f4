//! Subsystem wiring.
//!
//! Builds the adapters, bridges the routing index's registry lookup port
//! onto the facet registry mirror, and hands back the handles the rest of
//! the runtime drives.

use std::sync::Arc;

use async_trait::async_trait;

use ds_01_routing_index::adapters::{
    InMemoryAuditLog, InMemoryDiamondStore, InMemoryInstallationStore, InMemorySelectorIndex,
};
use ds_01_routing_index::domain::{EngineConfig, RegistryError};
use ds_01_routing_index::ports::FacetMetadataSource;
use ds_01_routing_index::Reconciler;
use ds_02_facet_registry::adapters::InMemoryFacetModuleStore;
use ds_02_facet_registry::ports::FacetRegistryApi;
use ds_02_facet_registry::FacetRegistryService;
use shared_types::{Address, FacetMetadata};

use crate::config::RuntimeConfig;

/// The wired subsystem graph for one runtime.
pub struct Wiring {
    /// The routing index engine.
    pub engine: Arc<Reconciler>,
    /// The facet registry mirror.
    pub registry: Arc<FacetRegistryService>,
    /// Diamond store handle, kept for snapshot export.
    pub diamonds: Arc<InMemoryDiamondStore>,
}

/// Implements the routing index's lookup port on top of the registry
/// mirror service. Mirror errors degrade to `Unavailable`; the engine
/// already treats those as best-effort misses.
struct RegistryBridge {
    registry: Arc<FacetRegistryService>,
}

#[async_trait]
impl FacetMetadataSource for RegistryBridge {
    async fn lookup(&self, facet: &Address) -> Result<Option<FacetMetadata>, RegistryError> {
        self.registry
            .lookup(facet)
            .map_err(|err| RegistryError::Unavailable(err.to_string()))
    }
}

/// Construct the full adapter graph.
pub fn build(config: &RuntimeConfig) -> Wiring {
    let registry = Arc::new(FacetRegistryService::new(Arc::new(
        InMemoryFacetModuleStore::new(),
    )));

    let diamonds = Arc::new(InMemoryDiamondStore::new());
    let engine = Arc::new(Reconciler::with_config(
        diamonds.clone(),
        Arc::new(InMemoryInstallationStore::new()),
        Arc::new(InMemorySelectorIndex::new()),
        Arc::new(InMemoryAuditLog::new()),
        Arc::new(RegistryBridge {
            registry: registry.clone(),
        }),
        EngineConfig {
            registry_timeout_ms: config.registry_timeout_ms,
            enrich_metadata: config.enrich_metadata,
        },
    ));

    Wiring {
        engine,
        registry,
        diamonds,
    }
}
