//! # Value Objects
//!
//! Immutable value objects for the Routing Table Index subsystem.

use serde::{Deserialize, Serialize};

use super::errors::RoutingError;

/// Classification placeholder for diamonds this subsystem synthesized on
/// first reference, before any authoritative initializer classified them.
///
/// A placeholder may be replaced by a real classification; a real
/// classification is never regressed back to the placeholder.
pub const UNKNOWN_CLASSIFICATION: &str = "unknown";

/// The three elementary mutation kinds a cut entry can carry.
///
/// Wire events encode the action as a numeric code. Decoding is exhaustive:
/// an unrecognized code is an explicit error, never a silent default to the
/// first variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutAction {
    /// Install a selector on a facet. The selector is expected unowned.
    Add,
    /// Move a selector from its current owner to a new facet.
    Replace,
    /// Uninstall a selector. The prior owner is resolved internally.
    Remove,
}

impl CutAction {
    /// Decode a numeric wire code.
    pub fn from_code(code: u8) -> Result<Self, RoutingError> {
        match code {
            0 => Ok(Self::Add),
            1 => Ok(Self::Replace),
            2 => Ok(Self::Remove),
            _ => Err(RoutingError::UnknownAction { code }),
        }
    }

    /// The numeric wire code for this action.
    pub fn code(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Replace => 1,
            Self::Remove => 2,
        }
    }
}

impl std::fmt::Display for CutAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Replace => write!(f, "REPLACE"),
            Self::Remove => write!(f, "REMOVE"),
        }
    }
}

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on one registry metadata lookup (milliseconds).
    ///
    /// A lookup that misses the bound degrades to "metadata unresolved";
    /// it is retried on the next mutation touching that facet.
    pub registry_timeout_ms: u64,
    /// Whether to attempt metadata enrichment at all (default: true).
    pub enrich_metadata: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry_timeout_ms: 250,
            enrich_metadata: true,
        }
    }
}

/// Processing counters for the subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingStats {
    /// Events accepted and applied.
    pub events_processed: u64,
    /// Events skipped because their ordering key was already committed.
    pub duplicates_skipped: u64,
    /// Elementary mutation records appended to the audit log.
    pub mutations_recorded: u64,
    /// Cut entries skipped (malformed selectors or unknown action code).
    pub entries_skipped: u64,
    /// Registry lookups that returned no metadata or failed.
    pub registry_misses: u64,
    /// Diamonds synthesized on first reference by a mutation event.
    pub instances_synthesized: u64,
}
