//! # Inbound Ports (Driving Ports)
//!
//! The event API the transport drives, one call per delivered event, plus
//! the read-side queries consumed by exporters and diagnostics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Selector};

use crate::domain::{FacetInstallation, RoutingError, RoutingStats, SelectorMutation};
use crate::events::{DiamondCut, InstanceCreated, SelectorAdded, SelectorRemoved, SelectorReplaced};

/// Result of applying one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// False when the event was a duplicate and state was left untouched.
    pub applied: bool,
    /// Elementary mutation records appended by this event.
    pub mutations: u32,
    /// Cut entries skipped (malformed selectors, unknown action code).
    pub entries_skipped: u32,
}

impl ApplyOutcome {
    /// Outcome for an idempotently skipped duplicate.
    pub fn duplicate() -> Self {
        Self {
            applied: false,
            mutations: 0,
            entries_skipped: 0,
        }
    }
}

/// Primary API of the Routing Table Index subsystem.
///
/// Events for one diamond must be delivered sequentially in transport
/// order; an accepted event runs to completion before the next one for the
/// same diamond is presented. Distinct diamonds may be processed in
/// parallel.
#[async_trait]
pub trait RoutingIndexApi: Send + Sync {
    /// Handle an explicit diamond creation event from the factory.
    async fn on_instance_created(
        &self,
        event: InstanceCreated,
    ) -> Result<ApplyOutcome, RoutingError>;

    /// Handle a bulk cut: entries are decomposed into elementary
    /// per-selector transitions and applied in array order.
    async fn on_diamond_cut(&self, event: DiamondCut) -> Result<ApplyOutcome, RoutingError>;

    /// Handle a granular single-selector install.
    async fn on_selector_added(&self, event: SelectorAdded)
        -> Result<ApplyOutcome, RoutingError>;

    /// Handle a granular single-selector removal. The payload carries no
    /// facet; the prior owner is resolved from the reverse selector index.
    async fn on_selector_removed(
        &self,
        event: SelectorRemoved,
    ) -> Result<ApplyOutcome, RoutingError>;

    /// Handle a granular single-selector reassignment.
    async fn on_selector_replaced(
        &self,
        event: SelectorReplaced,
    ) -> Result<ApplyOutcome, RoutingError>;

    /// Snapshot of all installations (current and closed) for a diamond.
    fn installations(&self, diamond: &Address) -> Result<Vec<FacetInstallation>, RoutingError>;

    /// The full ordered audit trail for a diamond.
    fn mutations(&self, diamond: &Address) -> Result<Vec<SelectorMutation>, RoutingError>;

    /// Current owner of a selector, straight from the reverse index.
    fn owner_of(
        &self,
        diamond: &Address,
        selector: Selector,
    ) -> Result<Option<Address>, RoutingError>;

    /// Processing counters.
    fn stats(&self) -> RoutingStats;
}
