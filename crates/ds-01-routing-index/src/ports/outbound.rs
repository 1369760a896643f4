//! # Outbound Ports (Driven Ports)
//!
//! SPIs required by the Routing Table Index subsystem. Stores are plain
//! key-value contracts with load/save semantics; only the registry lookup
//! crosses an I/O boundary and is therefore async.

use async_trait::async_trait;
use shared_types::{Address, EventMeta, FacetMetadata, OrderingKey, Selector, StoreError};

use crate::domain::{
    Diamond, FacetInstallation, RegistryError, SelectorMutation, SelectorOwnership,
};

/// Store for tracked diamond records.
pub trait DiamondStore: Send + Sync {
    /// Load a diamond by address.
    fn get(&self, diamond: &Address) -> Result<Option<Diamond>, StoreError>;

    /// Save a diamond record.
    fn put(&self, diamond: Diamond) -> Result<(), StoreError>;

    /// Load the diamond, synthesizing a placeholder record if it has never
    /// been seen. The flag reports whether the record was newly
    /// synthesized, so callers can distinguish authoritative creation from
    /// an inferred placeholder.
    fn get_or_create(
        &self,
        diamond: &Address,
        meta: &EventMeta,
    ) -> Result<(Diamond, bool), StoreError>;
}

/// Store for facet installations, keyed by the (diamond, facet) pair.
pub trait InstallationStore: Send + Sync {
    /// Load one installation by its identity.
    fn get(
        &self,
        diamond: &Address,
        facet: &Address,
    ) -> Result<Option<FacetInstallation>, StoreError>;

    /// Save an installation.
    fn put(&self, installation: FacetInstallation) -> Result<(), StoreError>;

    /// All currently active installations of a diamond. Used for
    /// diagnostics and export only; the hot path is direct key lookup.
    fn list_active(&self, diamond: &Address) -> Result<Vec<FacetInstallation>, StoreError>;

    /// All installations of a diamond, active and closed.
    fn list_all(&self, diamond: &Address) -> Result<Vec<FacetInstallation>, StoreError>;
}

/// The reverse selector index: per (diamond, selector), the authoritative
/// current owner.
pub trait SelectorIndex: Send + Sync {
    /// Load the ownership entry for a selector.
    fn get(
        &self,
        diamond: &Address,
        selector: Selector,
    ) -> Result<Option<SelectorOwnership>, StoreError>;

    /// Save an ownership entry.
    fn put(&self, ownership: SelectorOwnership) -> Result<(), StoreError>;
}

/// Append-only audit log of elementary mutations.
///
/// The contract deliberately exposes no update or delete: records are
/// immutable once appended. `exists` backs the idempotent-replay check and
/// `last_key` the ordering gate.
pub trait AuditLog: Send + Sync {
    /// Append one mutation record.
    fn append(&self, record: SelectorMutation) -> Result<(), StoreError>;

    /// Whether any record with this ordering key exists for the diamond.
    fn exists(&self, diamond: &Address, key: &OrderingKey) -> Result<bool, StoreError>;

    /// The highest ordering key committed for the diamond.
    fn last_key(&self, diamond: &Address) -> Result<Option<OrderingKey>, StoreError>;

    /// The full trail for a diamond, in total order.
    fn for_diamond(&self, diamond: &Address) -> Result<Vec<SelectorMutation>, StoreError>;
}

/// Read-only lookup into the facet registry mirror.
///
/// The mirror is maintained by its own ingestion pipeline and is eventually
/// consistent with its own event source; `Ok(None)` (not yet registered) is
/// an expected answer, not an error, and is retried on the next mutation
/// touching the facet.
#[async_trait]
pub trait FacetMetadataSource: Send + Sync {
    /// Look up display metadata for a facet address.
    async fn lookup(&self, facet: &Address) -> Result<Option<FacetMetadata>, RegistryError>;
}
