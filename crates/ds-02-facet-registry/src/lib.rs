//! # Facet Registry Mirror Subsystem (ds-02)
//!
//! A read-model of the on-chain facet registry: which facet addresses have
//! published a name, a version, and a declared selector list. Maintained by
//! its own ingestion pipeline (facet-registration events), independent of
//! any diamond's routing table.
//!
//! Consumers (the routing index) query this mirror by facet address and
//! treat it as eventually consistent reference data: a miss today may
//! resolve tomorrow, so callers retry instead of caching negatives.
//!
//! ## Key Responsibilities
//!
//! - Transcribe facet-registration events into `FacetModule` records,
//!   refreshing name/version/declared selectors on re-registration
//! - Serve `lookup(address) -> {name, version}` and
//!   `declared_selectors(address)` queries
//!
//! The declared selector list is what the facet *advertises*, independent
//! of what any diamond currently has installed; the two are compared by
//! diagnostics, never conflated.

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::{FacetModule, MirrorError};
pub use events::FacetRegistered;
pub use ports::{FacetModuleStore, FacetRegistryApi};
pub use service::FacetRegistryService;
pub use adapters::InMemoryFacetModuleStore;
