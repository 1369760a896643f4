//! # Ownership Invariant Properties
//!
//! Randomized event sequences against the routing index, checking after
//! every event that the derived state is internally consistent:
//!
//! 1. **Single owner**: no selector appears in two active installations,
//!    and every listed selector agrees with the reverse index.
//! 2. **Index completeness**: every owned reverse-index entry is listed by
//!    exactly the installation it names.
//! 3. **Closure**: inactive installations expose empty selector sets.
//!
//! Sequences are generated from fixed seeds so failures replay exactly.

// =============================================================================
// TEST FIXTURES (only compiled during tests)
// =============================================================================

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use rand::rngs::StdRng;
#[cfg(test)]
use rand::{Rng, SeedableRng};

#[cfg(test)]
use ds_01_routing_index::adapters::{
    InMemoryAuditLog, InMemoryDiamondStore, InMemoryInstallationStore, InMemorySelectorIndex,
    StaticMetadataSource,
};
#[cfg(test)]
use ds_01_routing_index::events::{
    CutEntry, DiamondCut, SelectorAdded, SelectorRemoved, SelectorReplaced,
};
#[cfg(test)]
use ds_01_routing_index::ports::RoutingIndexApi;
#[cfg(test)]
use ds_01_routing_index::Reconciler;
#[cfg(test)]
use shared_types::{Address, EventMeta, OrderingKey, Selector};

#[cfg(test)]
const DIAMOND: Address = [0xD1; 20];

#[cfg(test)]
fn engine() -> Reconciler {
    Reconciler::new(
        Arc::new(InMemoryDiamondStore::new()),
        Arc::new(InMemoryInstallationStore::new()),
        Arc::new(InMemorySelectorIndex::new()),
        Arc::new(InMemoryAuditLog::new()),
        Arc::new(StaticMetadataSource::empty()),
    )
}

#[cfg(test)]
fn facet_pool() -> Vec<Address> {
    (1..=4u8).map(|i| [i; 20]).collect()
}

#[cfg(test)]
fn selector_pool() -> Vec<Selector> {
    (1..=16u8).map(|i| Selector([i, 0, 0, 0])).collect()
}

#[cfg(test)]
fn meta(block: u64) -> EventMeta {
    EventMeta::new(1_000 + block, [(block % 251) as u8; 32], OrderingKey::new(block, 0, 0))
}

/// One random event: a small bulk cut or a granular mutation.
#[cfg(test)]
fn random_event(rng: &mut StdRng, block: u64) -> RandomEvent {
    let facets = facet_pool();
    let selectors = selector_pool();
    let facet = facets[rng.gen_range(0..facets.len())];
    let selector = selectors[rng.gen_range(0..selectors.len())];

    match rng.gen_range(0..4u8) {
        0 => RandomEvent::Cut(DiamondCut {
            diamond: DIAMOND,
            entries: (0..rng.gen_range(1..=3u8))
                .map(|_| {
                    let entry_facet = facets[rng.gen_range(0..facets.len())];
                    let action_code = rng.gen_range(0..=2u8);
                    let count = rng.gen_range(1..=3u8);
                    let packed = (0..count)
                        .flat_map(|_| {
                            selectors[rng.gen_range(0..selectors.len())].0.to_vec()
                        })
                        .collect();
                    CutEntry {
                        facet: entry_facet,
                        action_code,
                        selectors_packed: packed,
                    }
                })
                .collect(),
            init_facet: None,
            init_calldata: None,
            meta: meta(block),
        }),
        1 => RandomEvent::Add(SelectorAdded {
            diamond: DIAMOND,
            selector,
            facet,
            meta: meta(block),
        }),
        2 => RandomEvent::Replace(SelectorReplaced {
            diamond: DIAMOND,
            selector,
            new_facet: facet,
            meta: meta(block),
        }),
        _ => RandomEvent::Remove(SelectorRemoved {
            diamond: DIAMOND,
            selector,
            meta: meta(block),
        }),
    }
}

#[cfg(test)]
#[derive(Clone)]
enum RandomEvent {
    Cut(DiamondCut),
    Add(SelectorAdded),
    Replace(SelectorReplaced),
    Remove(SelectorRemoved),
}

#[cfg(test)]
async fn apply(engine: &Reconciler, event: RandomEvent) {
    let result = match event {
        RandomEvent::Cut(e) => engine.on_diamond_cut(e).await,
        RandomEvent::Add(e) => engine.on_selector_added(e).await,
        RandomEvent::Replace(e) => engine.on_selector_replaced(e).await,
        RandomEvent::Remove(e) => engine.on_selector_removed(e).await,
    };
    result.expect("in-order events over consistent state never fail");
}

/// The invariant bundle, checked against the full derived state.
#[cfg(test)]
fn assert_consistent(engine: &Reconciler) {
    let installations = engine.installations(&DIAMOND).unwrap();

    let mut owners: HashMap<Selector, Address> = HashMap::new();
    for inst in &installations {
        if !inst.active {
            assert!(
                inst.selectors.is_empty(),
                "closed installation still lists selectors"
            );
            continue;
        }
        assert!(
            !inst.selectors.is_empty(),
            "active installation owns no selectors"
        );
        for selector in &inst.selectors {
            let previous = owners.insert(*selector, inst.facet);
            assert!(
                previous.is_none(),
                "selector {selector} owned by two active installations"
            );
            assert_eq!(
                engine.owner_of(&DIAMOND, *selector).unwrap(),
                Some(inst.facet),
                "installation and reverse index disagree for {selector}"
            );
        }
    }

    // Every pool selector the index claims is owned must be listed by the
    // named installation (completeness in the other direction).
    for selector in selector_pool() {
        if let Some(owner) = engine.owner_of(&DIAMOND, selector).unwrap() {
            assert_eq!(
                owners.get(&selector),
                Some(&owner),
                "reverse index names an owner that does not list {selector}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run_sequence(seed: u64, events: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let engine = engine();

        for block in 1..=events {
            let event = random_event(&mut rng, block);
            apply(&engine, event).await;
            assert_consistent(&engine);
        }
    }

    #[tokio::test]
    async fn test_single_owner_holds_across_random_sequences() {
        for seed in [7, 42, 1337] {
            run_sequence(seed, 200).await;
        }
    }

    #[tokio::test]
    async fn test_random_log_redelivery_changes_nothing() {
        let mut rng = StdRng::seed_from_u64(99);
        let engine = engine();

        let log: Vec<RandomEvent> = (1..=100)
            .map(|block| random_event(&mut rng, block))
            .collect();
        for event in log.clone() {
            apply(&engine, event).await;
        }

        let installations = engine.installations(&DIAMOND).unwrap();
        let trail = engine.mutations(&DIAMOND).unwrap();

        // Redeliver the entire log from the start: every event is absorbed
        // by the idempotence gate, in order, without tripping the
        // out-of-order check.
        for event in log {
            apply(&engine, event).await;
        }

        assert_eq!(engine.installations(&DIAMOND).unwrap(), installations);
        assert_eq!(engine.mutations(&DIAMOND).unwrap(), trail);
        assert_consistent(&engine);
    }

    #[tokio::test]
    async fn test_audit_trail_is_totally_ordered() {
        let mut rng = StdRng::seed_from_u64(2024);
        let engine = engine();

        for block in 1..=150 {
            apply(&engine, random_event(&mut rng, block)).await;
        }

        let trail = engine.mutations(&DIAMOND).unwrap();
        for pair in trail.windows(2) {
            let earlier = (&pair[0].key, pair[0].entry_index, pair[0].selector_index);
            let later = (&pair[1].key, pair[1].entry_index, pair[1].selector_index);
            assert!(earlier <= later, "audit trail out of order");
        }
    }
}
