//! # Core Shared Entities
//!
//! Primitive identifiers and event references shared across subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `Hash`, `Address`
//! - **Event Ordering**: `OrderingKey`, `EventMeta`
//! - **Registry**: `FacetMetadata`

use serde::{Deserialize, Serialize};

/// A 32-byte hash (transaction hash, code hash).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
///
/// All diamond and facet identifiers use this type.
pub type Address = [u8; 20];

/// Canonical lowercase `0x`-prefixed rendering of an address.
///
/// Used for log fields and export keys; injective and stable across runs.
pub fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Canonical lowercase `0x`-prefixed rendering of a hash.
pub fn hash_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Total-order position of an event in the source log.
///
/// Ordering is lexicographic over (block, transaction index, log index),
/// which is exactly the order the transport delivers events in. Two events
/// never share a key, so this doubles as the idempotence key for replay.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct OrderingKey {
    /// Block number containing the event.
    pub block: u64,
    /// Transaction index within the block.
    pub tx_index: u32,
    /// Log index within the transaction.
    pub log_index: u32,
}

impl OrderingKey {
    /// Construct a key from its (block, tx, log) coordinates.
    pub fn new(block: u64, tx_index: u32, log_index: u32) -> Self {
        Self {
            block,
            tx_index,
            log_index,
        }
    }
}

impl std::fmt::Display for OrderingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.block, self.tx_index, self.log_index)
    }
}

/// Transport-level metadata attached to every inbound event.
///
/// The transport guarantees in-block order; `key` is the authoritative
/// position and `timestamp`/`tx` are carried into every derived record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Unix timestamp (seconds) of the block containing the event.
    pub timestamp: u64,
    /// Hash of the transaction that emitted the event.
    pub tx: Hash,
    /// Total-order position of the event in the source log.
    pub key: OrderingKey,
}

impl EventMeta {
    /// Construct event metadata.
    pub fn new(timestamp: u64, tx: Hash, key: OrderingKey) -> Self {
        Self { timestamp, tx, key }
    }
}

/// Display metadata for a facet, as published by the facet registry.
///
/// Returned by registry lookups; consumers cache it opportunistically and
/// retry unresolved lookups on the next mutation touching the facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetMetadata {
    /// Human-readable facet name.
    pub name: String,
    /// Facet version string.
    pub version: String,
}
