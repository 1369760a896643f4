//! # DiamondScope Indexer Runtime
//!
//! The composition root: wires the routing index and the facet registry
//! mirror together over in-memory adapters, replays an ordered JSON-lines
//! event log through them, and exports the derived routing tables.
//!
//! ## Modular Structure
//!
//! - `config` - runtime configuration (JSON file + environment overrides)
//! - `wiring` - adapter construction and the registry lookup bridge
//! - `transport` - file-based replay transport (one JSON event per line)
//! - `snapshot` - export of installations and audit trails per diamond
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file path from argv, env overrides)
//! 2. Initialize telemetry
//! 3. Wire subsystems
//! 4. Replay the event log in order
//! 5. Export the snapshot and log processing stats

pub mod config;
pub mod snapshot;
pub mod transport;
pub mod wiring;

pub use config::RuntimeConfig;
pub use transport::{ReplayReport, TransportEvent};
pub use wiring::Wiring;
