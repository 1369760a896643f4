//! # Adapters Layer
//!
//! In-memory implementations of the outbound ports. The runtime wires these
//! directly; tests use them as fixtures.

pub mod memory_store;
pub mod registry;

pub use memory_store::{
    InMemoryAuditLog, InMemoryDiamondStore, InMemoryInstallationStore, InMemorySelectorIndex,
};
pub use registry::StaticMetadataSource;
