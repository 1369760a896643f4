//! # Inbound Ports (Driving Ports)

use shared_types::{Address, FacetMetadata, Selector};

use crate::domain::MirrorError;
use crate::events::FacetRegistered;

/// Primary API of the Facet Registry Mirror.
///
/// Ingestion is a plain transcription: upserts are naturally idempotent,
/// and re-registrations refresh the published fields.
pub trait FacetRegistryApi: Send + Sync {
    /// Handle one facet-registration event.
    fn on_facet_registered(&self, event: FacetRegistered) -> Result<(), MirrorError>;

    /// Display metadata for a facet, if it has registered.
    fn lookup(&self, facet: &Address) -> Result<Option<FacetMetadata>, MirrorError>;

    /// The selector list a facet declares, if it has registered.
    fn declared_selectors(&self, facet: &Address) -> Result<Option<Vec<Selector>>, MirrorError>;
}
