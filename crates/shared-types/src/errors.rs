//! # Error Types
//!
//! Errors shared across subsystem store ports.

use thiserror::Error;

/// Errors that can occur in a derived-state store.
///
/// Stores never retry internally; a failed write propagates to the caller,
/// which owns redelivery. The consuming engine stays re-entrant for the same
/// event, so redelivery after a store failure is safe.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying storage I/O failed.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// Record could not be encoded or decoded.
    #[error("storage codec error: {0}")]
    Codec(String),

    /// A record that must exist was missing.
    #[error("record not found: {0}")]
    NotFound(String),
}
