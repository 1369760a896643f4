//! # Service Layer
//!
//! The reconciliation engine: consumes inbound events, drives the domain
//! state through the outbound ports.

pub mod reconciler;

pub use reconciler::Reconciler;
