//! In-memory implementations of the store ports.
//!
//! Maps are BTree-keyed so listings come back in a deterministic order
//! across runs, which keeps exports and test assertions stable.

use std::collections::{BTreeMap, HashSet};

use parking_lot::RwLock;

use shared_types::{Address, EventMeta, OrderingKey, Selector, StoreError};

use crate::domain::{Diamond, FacetInstallation, SelectorMutation, SelectorOwnership};
use crate::ports::{AuditLog, DiamondStore, InstallationStore, SelectorIndex};

/// In-memory implementation of `DiamondStore`.
#[derive(Default)]
pub struct InMemoryDiamondStore {
    diamonds: RwLock<BTreeMap<Address, Diamond>>,
}

impl InMemoryDiamondStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiamondStore for InMemoryDiamondStore {
    fn get(&self, diamond: &Address) -> Result<Option<Diamond>, StoreError> {
        Ok(self.diamonds.read().get(diamond).cloned())
    }

    fn put(&self, diamond: Diamond) -> Result<(), StoreError> {
        self.diamonds.write().insert(diamond.address, diamond);
        Ok(())
    }

    fn get_or_create(
        &self,
        diamond: &Address,
        meta: &EventMeta,
    ) -> Result<(Diamond, bool), StoreError> {
        let mut diamonds = self.diamonds.write();
        if let Some(existing) = diamonds.get(diamond) {
            return Ok((existing.clone(), false));
        }
        let synthesized = Diamond::observed(*diamond, meta);
        diamonds.insert(*diamond, synthesized.clone());
        Ok((synthesized, true))
    }
}

/// In-memory implementation of `InstallationStore`, keyed by the
/// (diamond, facet) pair.
#[derive(Default)]
pub struct InMemoryInstallationStore {
    installations: RwLock<BTreeMap<(Address, Address), FacetInstallation>>,
}

impl InMemoryInstallationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstallationStore for InMemoryInstallationStore {
    fn get(
        &self,
        diamond: &Address,
        facet: &Address,
    ) -> Result<Option<FacetInstallation>, StoreError> {
        Ok(self
            .installations
            .read()
            .get(&(*diamond, *facet))
            .cloned())
    }

    fn put(&self, installation: FacetInstallation) -> Result<(), StoreError> {
        self.installations
            .write()
            .insert((installation.diamond, installation.facet), installation);
        Ok(())
    }

    fn list_active(&self, diamond: &Address) -> Result<Vec<FacetInstallation>, StoreError> {
        Ok(self
            .installations
            .read()
            .range((*diamond, [0u8; 20])..=(*diamond, [0xFFu8; 20]))
            .map(|(_, inst)| inst.clone())
            .filter(|inst| inst.active)
            .collect())
    }

    fn list_all(&self, diamond: &Address) -> Result<Vec<FacetInstallation>, StoreError> {
        Ok(self
            .installations
            .read()
            .range((*diamond, [0u8; 20])..=(*diamond, [0xFFu8; 20]))
            .map(|(_, inst)| inst.clone())
            .collect())
    }
}

/// In-memory implementation of the reverse selector index.
#[derive(Default)]
pub struct InMemorySelectorIndex {
    entries: RwLock<BTreeMap<(Address, Selector), SelectorOwnership>>,
}

impl InMemorySelectorIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectorIndex for InMemorySelectorIndex {
    fn get(
        &self,
        diamond: &Address,
        selector: Selector,
    ) -> Result<Option<SelectorOwnership>, StoreError> {
        Ok(self.entries.read().get(&(*diamond, selector)).cloned())
    }

    fn put(&self, ownership: SelectorOwnership) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert((ownership.diamond, ownership.selector), ownership);
        Ok(())
    }
}

/// In-memory implementation of the append-only audit log.
///
/// The struct holds no way to rewrite history: records only accumulate,
/// and the seen-key set backs the idempotence check without scanning.
#[derive(Default)]
pub struct InMemoryAuditLog {
    records: RwLock<BTreeMap<Address, Vec<SelectorMutation>>>,
    seen_keys: RwLock<HashSet<(Address, OrderingKey)>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, record: SelectorMutation) -> Result<(), StoreError> {
        self.seen_keys.write().insert((record.diamond, record.key));
        self.records
            .write()
            .entry(record.diamond)
            .or_default()
            .push(record);
        Ok(())
    }

    fn exists(&self, diamond: &Address, key: &OrderingKey) -> Result<bool, StoreError> {
        Ok(self.seen_keys.read().contains(&(*diamond, *key)))
    }

    fn last_key(&self, diamond: &Address) -> Result<Option<OrderingKey>, StoreError> {
        Ok(self
            .records
            .read()
            .get(diamond)
            .and_then(|records| records.last())
            .map(|record| record.key))
    }

    fn for_diamond(&self, diamond: &Address) -> Result<Vec<SelectorMutation>, StoreError> {
        Ok(self.records.read().get(diamond).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CutAction;

    fn record(diamond: Address, block: u64, selector_byte: u8) -> SelectorMutation {
        SelectorMutation {
            diamond,
            selector: Selector([selector_byte, 0, 0, 0]),
            action: CutAction::Add,
            facet: Some([2u8; 20]),
            initiator: None,
            timestamp: 1000 + block,
            tx: [3u8; 32],
            key: OrderingKey::new(block, 0, 0),
            entry_index: 0,
            selector_index: 0,
        }
    }

    #[test]
    fn test_audit_log_append_and_order() {
        let log = InMemoryAuditLog::new();
        let diamond = [1u8; 20];

        log.append(record(diamond, 10, 1)).unwrap();
        log.append(record(diamond, 11, 2)).unwrap();

        let trail = log.for_diamond(&diamond).unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].key, OrderingKey::new(10, 0, 0));
        assert_eq!(log.last_key(&diamond).unwrap(), Some(OrderingKey::new(11, 0, 0)));
    }

    #[test]
    fn test_audit_log_exists_is_per_diamond() {
        let log = InMemoryAuditLog::new();
        log.append(record([1u8; 20], 10, 1)).unwrap();

        assert!(log.exists(&[1u8; 20], &OrderingKey::new(10, 0, 0)).unwrap());
        assert!(!log.exists(&[2u8; 20], &OrderingKey::new(10, 0, 0)).unwrap());
    }

    #[test]
    fn test_installation_listing_scoped_to_diamond() {
        let store = InMemoryInstallationStore::new();
        let meta = EventMeta::new(100, [0u8; 32], OrderingKey::new(1, 0, 0));

        let mut a = FacetInstallation::install([1u8; 20], [0xAAu8; 20], &meta);
        a.add_selector(Selector([1, 0, 0, 0]), &meta);
        store.put(a).unwrap();

        let b = FacetInstallation::install([2u8; 20], [0xBBu8; 20], &meta);
        store.put(b).unwrap();

        let mut closed = FacetInstallation::install([1u8; 20], [0xCCu8; 20], &meta);
        closed.close(&meta);
        store.put(closed).unwrap();

        assert_eq!(store.list_active(&[1u8; 20]).unwrap().len(), 1);
        assert_eq!(store.list_all(&[1u8; 20]).unwrap().len(), 2);
        assert_eq!(store.list_all(&[2u8; 20]).unwrap().len(), 1);
    }

    #[test]
    fn test_get_or_create_reports_provenance_once() {
        let store = InMemoryDiamondStore::new();
        let meta = EventMeta::new(100, [0u8; 32], OrderingKey::new(1, 0, 0));

        let (first, created) = store.get_or_create(&[1u8; 20], &meta).unwrap();
        assert!(created);
        assert!(first.synthesized);

        let (second, created_again) = store.get_or_create(&[1u8; 20], &meta).unwrap();
        assert!(!created_again);
        assert_eq!(first, second);
    }
}
