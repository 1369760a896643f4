//! # Domain Errors

use thiserror::Error;

use shared_types::StoreError;

/// Errors surfaced by the registry mirror.
#[derive(Debug, Clone, Error)]
pub enum MirrorError {
    /// A store operation failed; the caller owns redelivery.
    #[error(transparent)]
    Store(#[from] StoreError),
}
