//! Reconciliation engine.
//!
//! Applies one inbound event at a time to the routing-table state. Every
//! event reduces to elementary per-selector transitions over the state
//! machine `UNOWNED -> OWNED(facet) -> UNOWNED -> ...`:
//!
//! | Action  | Reverse index            | Installations                            |
//! |---------|--------------------------|------------------------------------------|
//! | ADD     | owner := new facet       | create/reactivate new owner, append sel  |
//! | REPLACE | owner := new facet       | detach from resolved old owner, append   |
//! | REMOVE  | owner := unowned         | detach from resolved old owner           |
//!
//! Prior ownership is always resolved from the reverse selector index.
//! Event payloads are never trusted for it: the removal variants do not
//! carry the old owner at all, and the ones that do may disagree with
//! history this subsystem has already committed.
//!
//! Per-event gate, in order: an ordering key already present in the audit
//! log is an idempotent duplicate (skip, success); a key behind the last
//! committed one is a transport-order violation (fatal for the diamond).

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use shared_types::{address_hex, decode_packed, Address, EventMeta, OrderingKey, Selector};

use crate::domain::{
    CutAction, Diamond, EngineConfig, FacetInstallation, RoutingError, RoutingStats,
    SelectorMutation, SelectorOwnership,
};
use crate::events::{DiamondCut, InstanceCreated, SelectorAdded, SelectorRemoved, SelectorReplaced};
use crate::ports::{
    ApplyOutcome, AuditLog, DiamondStore, FacetMetadataSource, InstallationStore, RoutingIndexApi,
    SelectorIndex,
};

/// The reconciliation engine. One instance serves all diamonds; callers
/// must serialize events per diamond (distinct diamonds may proceed in
/// parallel, the stores are `Sync`).
pub struct Reconciler {
    diamonds: Arc<dyn DiamondStore>,
    installations: Arc<dyn InstallationStore>,
    index: Arc<dyn SelectorIndex>,
    audit: Arc<dyn AuditLog>,
    registry: Arc<dyn FacetMetadataSource>,
    config: EngineConfig,
    stats: RwLock<RoutingStats>,
}

/// Per-event context threaded through the elementary transitions.
struct EventCtx<'a> {
    diamond: &'a Address,
    meta: &'a EventMeta,
    initiator: Option<Address>,
}

enum Gate {
    Duplicate,
    Proceed,
}

/// A granular single-selector event, normalized.
enum GranularOp {
    Assign {
        selector: Selector,
        facet: Address,
        action: CutAction,
    },
    Clear {
        selector: Selector,
    },
}

impl Reconciler {
    /// Build an engine over the given ports with default configuration.
    pub fn new(
        diamonds: Arc<dyn DiamondStore>,
        installations: Arc<dyn InstallationStore>,
        index: Arc<dyn SelectorIndex>,
        audit: Arc<dyn AuditLog>,
        registry: Arc<dyn FacetMetadataSource>,
    ) -> Self {
        Self::with_config(
            diamonds,
            installations,
            index,
            audit,
            registry,
            EngineConfig::default(),
        )
    }

    /// Build an engine with explicit configuration.
    pub fn with_config(
        diamonds: Arc<dyn DiamondStore>,
        installations: Arc<dyn InstallationStore>,
        index: Arc<dyn SelectorIndex>,
        audit: Arc<dyn AuditLog>,
        registry: Arc<dyn FacetMetadataSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            diamonds,
            installations,
            index,
            audit,
            registry,
            config,
            stats: RwLock::new(RoutingStats::default()),
        }
    }

    /// Duplicate/ordering gate. Runs before any state is touched.
    fn gate(&self, diamond: &Address, key: &OrderingKey) -> Result<Gate, RoutingError> {
        if self.audit.exists(diamond, key)? {
            debug!(
                diamond = %address_hex(diamond),
                key = %key,
                "ordering key already committed; skipping duplicate event"
            );
            return Ok(Gate::Duplicate);
        }
        if let Some(last) = self.audit.last_key(diamond)? {
            if *key < last {
                return Err(RoutingError::OutOfOrder {
                    diamond: address_hex(diamond),
                    last,
                    got: *key,
                });
            }
        }
        Ok(Gate::Proceed)
    }

    /// Load the diamond record, synthesizing a placeholder on first
    /// reference.
    fn ensure_diamond(&self, diamond: &Address, meta: &EventMeta) -> Result<(), RoutingError> {
        let (_, created) = self.diamonds.get_or_create(diamond, meta)?;
        if created {
            self.stats.write().instances_synthesized += 1;
            info!(
                diamond = %address_hex(diamond),
                "mutation event for unseen diamond; synthesized placeholder record"
            );
        }
        Ok(())
    }

    fn drift_error(&self, diamond: &Address, selector: Selector, facet: &Address) -> RoutingError {
        RoutingError::OwnershipDrift {
            diamond: address_hex(diamond),
            selector: selector.to_hex(),
            facet: address_hex(facet),
        }
    }

    /// Point a selector at `new_facet`, detaching whoever owned it before.
    fn assign(
        &self,
        ctx: &EventCtx<'_>,
        selector: Selector,
        new_facet: Address,
        action: CutAction,
        entry_index: u32,
        selector_index: u32,
    ) -> Result<(), RoutingError> {
        let prior = self
            .index
            .get(ctx.diamond, selector)?
            .and_then(|entry| entry.owner);

        if prior == Some(new_facet) {
            // Ownership is already where the event wants it. REPLACE onto
            // the same facet is an explicit state confirmation; a repeated
            // ADD is upstream drift. Either way the selector sets stay
            // untouched, but the index and the installation must agree.
            match self.installations.get(ctx.diamond, &new_facet)? {
                Some(inst) if inst.active && inst.contains(selector) => {
                    debug!(
                        diamond = %address_hex(ctx.diamond),
                        selector = %selector,
                        facet = %address_hex(&new_facet),
                        action = %action,
                        "selector already routed to this facet; state confirmed"
                    );
                }
                Some(inst) if inst.active => {
                    return Err(self.drift_error(ctx.diamond, selector, &new_facet));
                }
                _ => {
                    warn!(
                        diamond = %address_hex(ctx.diamond),
                        selector = %selector,
                        facet = %address_hex(&new_facet),
                        "index names an owner without a live installation; rebuilding it"
                    );
                    self.attach(ctx, selector, new_facet)?;
                }
            }
        } else {
            if let Some(old) = prior {
                if action == CutAction::Add {
                    warn!(
                        diamond = %address_hex(ctx.diamond),
                        selector = %selector,
                        old_facet = %address_hex(&old),
                        new_facet = %address_hex(&new_facet),
                        "ADD hit an owned selector; healing by reassignment"
                    );
                }
                self.detach(ctx, selector, &old)?;
            }
            self.attach(ctx, selector, new_facet)?;
            self.index.put(SelectorOwnership {
                diamond: *ctx.diamond,
                selector,
                owner: Some(new_facet),
                changed_at: ctx.meta.timestamp,
                changed_tx: ctx.meta.tx,
            })?;
        }

        self.record(ctx, selector, action, Some(new_facet), entry_index, selector_index)
    }

    /// Clear a selector, resolving the prior owner from the index alone.
    fn clear(
        &self,
        ctx: &EventCtx<'_>,
        selector: Selector,
        entry_index: u32,
        selector_index: u32,
    ) -> Result<(), RoutingError> {
        let prior = self
            .index
            .get(ctx.diamond, selector)?
            .and_then(|entry| entry.owner);

        let attributed = match prior {
            Some(old) => {
                self.detach(ctx, selector, &old)?;
                self.index.put(SelectorOwnership {
                    diamond: *ctx.diamond,
                    selector,
                    owner: None,
                    changed_at: ctx.meta.timestamp,
                    changed_tx: ctx.meta.tx,
                })?;
                Some(old)
            }
            None => {
                debug!(
                    diamond = %address_hex(ctx.diamond),
                    selector = %selector,
                    "REMOVE on an unowned selector; tolerated as a no-op"
                );
                None
            }
        };

        self.record(ctx, selector, CutAction::Remove, attributed, entry_index, selector_index)
    }

    /// Remove a selector from the resolved prior owner's installation,
    /// closing the installation when its set empties.
    ///
    /// A missing or already-closed installation is tolerated: it means an
    /// event this subsystem never saw already detached the facet, and the
    /// index entry is the only remnant. An active installation that does
    /// not list the selector is a true internal disagreement and fatal.
    fn detach(
        &self,
        ctx: &EventCtx<'_>,
        selector: Selector,
        old_facet: &Address,
    ) -> Result<(), RoutingError> {
        match self.installations.get(ctx.diamond, old_facet)? {
            None => {
                warn!(
                    diamond = %address_hex(ctx.diamond),
                    selector = %selector,
                    facet = %address_hex(old_facet),
                    "resolved prior owner has no installation record; tolerating stale index entry"
                );
            }
            Some(inst) if !inst.active => {
                warn!(
                    diamond = %address_hex(ctx.diamond),
                    selector = %selector,
                    facet = %address_hex(old_facet),
                    "resolved prior owner is already closed; tolerating stale index entry"
                );
            }
            Some(mut inst) => {
                if !inst.contains(selector) {
                    return Err(self.drift_error(ctx.diamond, selector, old_facet));
                }
                inst.remove_selector(selector, ctx.meta);
                if inst.selectors.is_empty() {
                    inst.close(ctx.meta);
                    info!(
                        diamond = %address_hex(ctx.diamond),
                        facet = %address_hex(old_facet),
                        "last selector left; installation closed"
                    );
                }
                self.installations.put(inst)?;
            }
        }
        Ok(())
    }

    /// Append a selector to `facet`'s installation, creating or
    /// reactivating it as needed.
    fn attach(
        &self,
        ctx: &EventCtx<'_>,
        selector: Selector,
        facet: Address,
    ) -> Result<(), RoutingError> {
        let mut inst = match self.installations.get(ctx.diamond, &facet)? {
            Some(mut existing) => {
                if !existing.active {
                    existing.reactivate(ctx.meta);
                    info!(
                        diamond = %address_hex(ctx.diamond),
                        facet = %address_hex(&facet),
                        "facet re-added; installation reactivated with original identity"
                    );
                }
                existing
            }
            None => {
                info!(
                    diamond = %address_hex(ctx.diamond),
                    facet = %address_hex(&facet),
                    "facet installed"
                );
                FacetInstallation::install(*ctx.diamond, facet, ctx.meta)
            }
        };
        inst.add_selector(selector, ctx.meta);
        self.installations.put(inst)?;
        Ok(())
    }

    /// Append the audit record for one processed elementary change.
    fn record(
        &self,
        ctx: &EventCtx<'_>,
        selector: Selector,
        action: CutAction,
        facet: Option<Address>,
        entry_index: u32,
        selector_index: u32,
    ) -> Result<(), RoutingError> {
        self.audit.append(SelectorMutation {
            diamond: *ctx.diamond,
            selector,
            action,
            facet,
            initiator: ctx.initiator,
            timestamp: ctx.meta.timestamp,
            tx: ctx.meta.tx,
            key: ctx.meta.key,
            entry_index,
            selector_index,
        })?;
        Ok(())
    }

    /// Best-effort metadata enrichment for installations touched by the
    /// event. A resolved lookup refreshes the cached name/version; misses,
    /// failures, and timeouts leave the cache as it was (no negative
    /// caching) and are retried on the next mutation touching the facet.
    async fn enrich(&self, diamond: &Address, touched: &BTreeSet<Address>) {
        if !self.config.enrich_metadata {
            return;
        }
        for facet in touched {
            let inst = match self.installations.get(diamond, facet) {
                Ok(Some(inst)) => inst,
                _ => continue,
            };
            if !inst.active {
                continue;
            }

            let bound = Duration::from_millis(self.config.registry_timeout_ms);
            match tokio::time::timeout(bound, self.registry.lookup(facet)).await {
                Ok(Ok(Some(metadata))) => {
                    let mut inst = inst;
                    inst.facet_name = Some(metadata.name);
                    inst.facet_version = Some(metadata.version);
                    if let Err(err) = self.installations.put(inst) {
                        warn!(
                            facet = %address_hex(facet),
                            error = %err,
                            "failed to persist resolved facet metadata"
                        );
                    }
                }
                Ok(Ok(None)) => {
                    self.stats.write().registry_misses += 1;
                    debug!(
                        facet = %address_hex(facet),
                        "facet not yet registered; metadata unresolved"
                    );
                }
                Ok(Err(err)) => {
                    self.stats.write().registry_misses += 1;
                    warn!(
                        facet = %address_hex(facet),
                        error = %err,
                        "registry lookup failed; metadata unresolved"
                    );
                }
                Err(_) => {
                    self.stats.write().registry_misses += 1;
                    warn!(
                        facet = %address_hex(facet),
                        timeout_ms = self.config.registry_timeout_ms,
                        "registry lookup timed out; metadata unresolved"
                    );
                }
            }
        }
    }

    /// Shared driver for the granular single-selector events.
    async fn apply_granular(
        &self,
        diamond: Address,
        meta: EventMeta,
        op: GranularOp,
    ) -> Result<ApplyOutcome, RoutingError> {
        match self.gate(&diamond, &meta.key)? {
            Gate::Duplicate => {
                self.stats.write().duplicates_skipped += 1;
                return Ok(ApplyOutcome::duplicate());
            }
            Gate::Proceed => {}
        }
        self.ensure_diamond(&diamond, &meta)?;

        let ctx = EventCtx {
            diamond: &diamond,
            meta: &meta,
            initiator: None,
        };

        let mut touched = BTreeSet::new();
        match op {
            GranularOp::Assign {
                selector,
                facet,
                action,
            } => {
                self.assign(&ctx, selector, facet, action, 0, 0)?;
                touched.insert(facet);
            }
            GranularOp::Clear { selector } => {
                self.clear(&ctx, selector, 0, 0)?;
            }
        }

        self.enrich(&diamond, &touched).await;

        let mut stats = self.stats.write();
        stats.events_processed += 1;
        stats.mutations_recorded += 1;

        Ok(ApplyOutcome {
            applied: true,
            mutations: 1,
            entries_skipped: 0,
        })
    }
}

#[async_trait]
impl RoutingIndexApi for Reconciler {
    async fn on_instance_created(
        &self,
        event: InstanceCreated,
    ) -> Result<ApplyOutcome, RoutingError> {
        match self.diamonds.get(&event.diamond)? {
            None => {
                self.diamonds
                    .put(Diamond::created(event.diamond, event.creator, &event.meta))?;
                info!(
                    diamond = %address_hex(&event.diamond),
                    creator = %address_hex(&event.creator),
                    "diamond created"
                );
            }
            Some(mut existing) if existing.synthesized => {
                existing.confirm_created(event.creator, &event.meta);
                self.diamonds.put(existing)?;
                info!(
                    diamond = %address_hex(&event.diamond),
                    "creation event arrived for synthesized diamond; provenance upgraded"
                );
            }
            Some(_) => {
                self.stats.write().duplicates_skipped += 1;
                debug!(
                    diamond = %address_hex(&event.diamond),
                    "duplicate creation event; skipped"
                );
                return Ok(ApplyOutcome::duplicate());
            }
        }

        self.stats.write().events_processed += 1;
        Ok(ApplyOutcome {
            applied: true,
            mutations: 0,
            entries_skipped: 0,
        })
    }

    async fn on_diamond_cut(&self, event: DiamondCut) -> Result<ApplyOutcome, RoutingError> {
        match self.gate(&event.diamond, &event.meta.key)? {
            Gate::Duplicate => {
                self.stats.write().duplicates_skipped += 1;
                return Ok(ApplyOutcome::duplicate());
            }
            Gate::Proceed => {}
        }
        self.ensure_diamond(&event.diamond, &event.meta)?;

        let ctx = EventCtx {
            diamond: &event.diamond,
            meta: &event.meta,
            initiator: event.init_facet,
        };

        let mut outcome = ApplyOutcome {
            applied: true,
            mutations: 0,
            entries_skipped: 0,
        };
        let mut touched = BTreeSet::new();

        for (entry_index, entry) in event.entries.iter().enumerate() {
            let action = match CutAction::from_code(entry.action_code) {
                Ok(action) => action,
                Err(err) => {
                    warn!(
                        diamond = %address_hex(&event.diamond),
                        entry_index,
                        error = %err,
                        "skipping cut entry with unrecognized action code"
                    );
                    outcome.entries_skipped += 1;
                    continue;
                }
            };
            let selectors = match decode_packed(&entry.selectors_packed) {
                Ok(selectors) => selectors,
                Err(err) => {
                    warn!(
                        diamond = %address_hex(&event.diamond),
                        entry_index,
                        error = %err,
                        "skipping cut entry with malformed selector packing"
                    );
                    outcome.entries_skipped += 1;
                    continue;
                }
            };

            for (selector_index, selector) in selectors.into_iter().enumerate() {
                match action {
                    CutAction::Add | CutAction::Replace => {
                        self.assign(
                            &ctx,
                            selector,
                            entry.facet,
                            action,
                            entry_index as u32,
                            selector_index as u32,
                        )?;
                        touched.insert(entry.facet);
                    }
                    CutAction::Remove => {
                        self.clear(&ctx, selector, entry_index as u32, selector_index as u32)?;
                    }
                }
                outcome.mutations += 1;
            }
        }

        self.enrich(&event.diamond, &touched).await;

        let mut stats = self.stats.write();
        stats.events_processed += 1;
        stats.mutations_recorded += u64::from(outcome.mutations);
        stats.entries_skipped += u64::from(outcome.entries_skipped);
        drop(stats);

        debug!(
            diamond = %address_hex(&event.diamond),
            key = %event.meta.key,
            mutations = outcome.mutations,
            skipped = outcome.entries_skipped,
            "cut applied"
        );
        Ok(outcome)
    }

    async fn on_selector_added(
        &self,
        event: SelectorAdded,
    ) -> Result<ApplyOutcome, RoutingError> {
        self.apply_granular(
            event.diamond,
            event.meta,
            GranularOp::Assign {
                selector: event.selector,
                facet: event.facet,
                action: CutAction::Add,
            },
        )
        .await
    }

    async fn on_selector_removed(
        &self,
        event: SelectorRemoved,
    ) -> Result<ApplyOutcome, RoutingError> {
        self.apply_granular(
            event.diamond,
            event.meta,
            GranularOp::Clear {
                selector: event.selector,
            },
        )
        .await
    }

    async fn on_selector_replaced(
        &self,
        event: SelectorReplaced,
    ) -> Result<ApplyOutcome, RoutingError> {
        self.apply_granular(
            event.diamond,
            event.meta,
            GranularOp::Assign {
                selector: event.selector,
                facet: event.new_facet,
                action: CutAction::Replace,
            },
        )
        .await
    }

    fn installations(&self, diamond: &Address) -> Result<Vec<FacetInstallation>, RoutingError> {
        Ok(self.installations.list_all(diamond)?)
    }

    fn mutations(&self, diamond: &Address) -> Result<Vec<SelectorMutation>, RoutingError> {
        Ok(self.audit.for_diamond(diamond)?)
    }

    fn owner_of(
        &self,
        diamond: &Address,
        selector: Selector,
    ) -> Result<Option<Address>, RoutingError> {
        Ok(self.index.get(diamond, selector)?.and_then(|entry| entry.owner))
    }

    fn stats(&self) -> RoutingStats {
        *self.stats.read()
    }
}
