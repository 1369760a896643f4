//! # Service Layer

pub mod registry;

pub use registry::FacetRegistryService;
