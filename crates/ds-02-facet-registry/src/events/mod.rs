//! # Events Layer

pub mod payloads;

pub use payloads::FacetRegistered;
