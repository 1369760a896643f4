//! # Domain Errors
//!
//! Error taxonomy for the Routing Table Index subsystem.
//!
//! Two severities matter to callers:
//!
//! - **Transient** conditions (malformed selector packing, unknown action
//!   codes, registry misses) are handled inside the engine at per-entry
//!   granularity: logged, counted, skipped. They never surface from the
//!   inbound API.
//! - **Structural** conditions (`OutOfOrder`, `OwnershipDrift`) and store
//!   failures are returned as errors and stop processing for that diamond.

use thiserror::Error;

use shared_types::{OrderingKey, SelectorCodecError, StoreError};

/// Errors surfaced by routing-table reconciliation.
#[derive(Debug, Clone, Error)]
pub enum RoutingError {
    /// An event arrived behind the last committed ordering key for its
    /// diamond. The transport guarantees total order; this indicates a
    /// violated delivery guarantee and continuing would corrupt ownership
    /// state irrecoverably.
    #[error("event {got} for diamond {diamond} is behind last committed key {last}")]
    OutOfOrder {
        diamond: String,
        last: OrderingKey,
        got: OrderingKey,
    },

    /// A cut entry carried an action code outside the known set.
    #[error("unknown cut action code {code}")]
    UnknownAction { code: u8 },

    /// The reverse selector index and an installation's selector set
    /// disagree. The two structures are written together; disagreement is
    /// an internal bug and the fix direction is ambiguous, so processing
    /// for the diamond stops rather than silently repairing either side.
    #[error("index claims {selector} on {diamond} is owned by {facet}, but that installation does not list it")]
    OwnershipDrift {
        diamond: String,
        selector: String,
        facet: String,
    },

    /// Packed selector bytes could not be decoded.
    #[error(transparent)]
    Codec(#[from] SelectorCodecError),

    /// A store operation failed; the caller owns redelivery.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the facet registry lookup port.
///
/// Registry failures are always best-effort from the engine's point of
/// view: they degrade to unresolved metadata, never to a failed event.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The lookup did not complete within the configured bound.
    #[error("registry lookup timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The registry mirror could not be reached.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
