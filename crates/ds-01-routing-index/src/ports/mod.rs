//! # Ports Layer
//!
//! - `inbound`: the event API this subsystem exposes to the transport
//! - `outbound`: the SPIs this subsystem requires (stores, registry)

pub mod inbound;
pub mod outbound;

pub use inbound::{ApplyOutcome, RoutingIndexApi};
pub use outbound::{
    AuditLog, DiamondStore, FacetMetadataSource, InstallationStore, SelectorIndex,
};
