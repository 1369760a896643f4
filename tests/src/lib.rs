//! # DiamondScope Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── routing_flows.rs        # Cross-subsystem event flows
//!     └── ownership_properties.rs # Randomized invariant checks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ds-tests
//!
//! # By category
//! cargo test -p ds-tests integration::routing_flows::
//! cargo test -p ds-tests integration::ownership_properties::
//! ```

pub mod integration;
