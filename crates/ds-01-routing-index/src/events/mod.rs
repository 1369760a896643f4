//! # Events Layer
//!
//! Transport payload types for the inbound event stream.

pub mod payloads;

pub use payloads::{
    CutEntry, DiamondCut, InstanceCreated, SelectorAdded, SelectorRemoved, SelectorReplaced,
};
