//! # Ports Layer

pub mod inbound;
pub mod outbound;

pub use inbound::FacetRegistryApi;
pub use outbound::FacetModuleStore;
