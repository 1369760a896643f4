//! # Shared Types Crate
//!
//! This crate contains the primitive types shared by every DiamondScope
//! subsystem: byte-array aliases, the function-selector codec, and the
//! event ordering references used for replay.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Canonical Text Forms**: Selectors and addresses have one stable,
//!   injective hex rendering used as index keys and in exports.
//! - **Total Event Order**: `OrderingKey` is the sole replay position for an
//!   event; payloads never carry a second copy of it.

pub mod entities;
pub mod errors;
pub mod selector;

pub use entities::*;
pub use errors::StoreError;
pub use selector::{decode_packed, Selector, SelectorCodecError, SELECTOR_WIDTH};
