//! # Routing Table Index Subsystem (ds-01)
//!
//! The Routing Table Index is the system's authority for "which facet owns
//! which function selector on which diamond, right now". It consumes the
//! ordered stream of routing mutation events (bulk diamond cuts and granular
//! selector add/replace/remove events), derives the current routing table of
//! every tracked diamond, and appends an immutable audit trail of every
//! elementary change.
//!
//! ## Key Responsibilities
//!
//! - Decompose bulk cuts into elementary per-selector transitions and apply
//!   them in array order
//! - Maintain `FacetInstallation` records (current and historical selector
//!   ownership per (diamond, facet) pair)
//! - Maintain the reverse selector index (`SelectorOwnership`), the
//!   authoritative answer to "who owns selector X". Removal events do not
//!   name the prior owner, so it is always resolved here, never read from
//!   the event payload
//! - Append one `SelectorMutation` audit record per processed elementary
//!   change, totally ordered for replay
//! - Opportunistically enrich installations with facet name/version from the
//!   facet registry (best-effort, timeout-bounded)
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | Single Owner: at most one active installation claims a selector, and it matches the reverse index | reconciler detach-before-attach; drift is fatal |
//! | INVARIANT-2 | Append-Only Audit: mutation records are never updated or deleted | `AuditLog` port exposes no update/delete |
//! | INVARIANT-3 | Ordered Replay: an ordering key below the last committed key is fatal for that diamond | `Reconciler` gate check |
//! | INVARIANT-4 | Idempotent Replay: a key already present in the audit log is skipped without state change | `Reconciler` gate check |
//! | INVARIANT-5 | Identity Reuse: re-adding a removed facet reactivates the same installation, preserving its first-install fields | `FacetInstallation::reactivate` |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): entities, cut actions, error taxonomy; no I/O
//! - **Ports Layer** (`ports/`): inbound event API, outbound store/registry SPIs
//! - **Service Layer** (`service/`): the reconciliation engine
//! - **Events Layer** (`events/`): transport payload types
//! - **Adapters Layer** (`adapters/`): in-memory store implementations

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-export main types for convenience
pub use domain::{
    CutAction, Diamond, EngineConfig, FacetInstallation, RegistryError, RoutingError,
    RoutingStats, SelectorMutation, SelectorOwnership, UNKNOWN_CLASSIFICATION,
};

pub use ports::{
    ApplyOutcome, AuditLog, DiamondStore, FacetMetadataSource, InstallationStore,
    RoutingIndexApi, SelectorIndex,
};

pub use events::{
    CutEntry, DiamondCut, InstanceCreated, SelectorAdded, SelectorRemoved, SelectorReplaced,
};

pub use service::Reconciler;

pub use adapters::{
    InMemoryAuditLog, InMemoryDiamondStore, InMemoryInstallationStore, InMemorySelectorIndex,
    StaticMetadataSource,
};
