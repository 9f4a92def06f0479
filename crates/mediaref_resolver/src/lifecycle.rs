//! Batch hydration and teardown.

use crate::{ContentCollection, ReferenceResolver, ResolveOutcome};
use futures::future::join_all;
use mediaref_core::{ContentItem, ContentPatch, Resolution, UrlKind};
use mediaref_error::ReferenceUnresolvedError;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Message recorded on items that fail every strategy.
pub const MEDIA_UNAVAILABLE: &str = "media unavailable";

/// Whether the view may render yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum HydrationState {
    /// No hydration has run
    #[display("idle")]
    Idle,
    /// A hydration pass is in flight
    #[display("hydrating")]
    Hydrating,
    /// The last hydration pass completed
    #[display("ready")]
    Ready,
}

/// Result of hydrating one item.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// The primary reference was live; nothing ran
    Skipped,
    /// A resolution was found
    Resolved(Resolution),
    /// The item left the collection mid-hydration
    Discarded,
    /// Every strategy failed; the item was marked as errored
    Failed(ReferenceUnresolvedError),
}

/// Outcome for one item of a batch.
#[derive(Debug, Clone)]
pub struct ItemReport {
    /// Item id
    pub item_id: String,
    /// What happened
    pub outcome: ItemOutcome,
}

/// Per-item results of [`MediaLifecycle::hydrate_all`].
#[derive(Debug, Clone, Default)]
pub struct HydrationReport {
    /// One entry per input item, in input order
    pub items: Vec<ItemReport>,
    /// Object URLs minted during the pass
    pub minted: usize,
}

impl HydrationReport {
    fn count(&self, f: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|r| f(&r.outcome)).count()
    }

    /// Items that resolved.
    pub fn resolved(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Resolved(_)))
    }

    /// Items that failed every strategy.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    /// Items that needed no work.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped))
    }

    /// Report for one item.
    pub fn get(&self, item_id: &str) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|r| r.item_id == item_id)
            .map(|r| &r.outcome)
    }
}

/// Hydration and teardown hooks for a collection's view.
///
/// `hydrate_all` runs when the view becomes visible and `revoke_all` when it
/// is torn down. The view gates rendering on [`MediaLifecycle::wait_ready`].
pub struct MediaLifecycle {
    resolver: Arc<ReferenceResolver>,
    collection: Arc<dyn ContentCollection>,
    state: watch::Sender<HydrationState>,
}

impl MediaLifecycle {
    /// Lifecycle over `resolver`, marking failures through `collection`.
    pub fn new(resolver: Arc<ReferenceResolver>, collection: Arc<dyn ContentCollection>) -> Self {
        let (state, _) = watch::channel(HydrationState::Idle);
        Self {
            resolver,
            collection,
            state,
        }
    }

    /// Resolver this lifecycle drives.
    pub fn resolver(&self) -> &Arc<ReferenceResolver> {
        &self.resolver
    }

    /// Current hydration state.
    pub fn state(&self) -> HydrationState {
        *self.state.borrow()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<HydrationState> {
        self.state.subscribe()
    }

    /// Wait until a hydration pass has completed.
    pub async fn wait_ready(&self) {
        let mut rx = self.state.subscribe();
        if rx
            .wait_for(|state| *state == HydrationState::Ready)
            .await
            .is_err()
        {
            tracing::debug!("Hydration state channel closed");
        }
    }

    /// Whether an item's primary reference is missing or a dead object URL.
    pub async fn needs_hydration(&self, item: &ContentItem) -> bool {
        match item.primary_url() {
            None => true,
            Some(url) if UrlKind::classify(url) == UrlKind::Blob => {
                !self.resolver.validator().is_valid(url).await
            }
            Some(_) => false,
        }
    }

    /// Resolve every item whose primary reference is missing or dead.
    ///
    /// Items are resolved concurrently and the call returns once every item
    /// has been attempted. A failed item is marked as errored and does not
    /// stop the others.
    #[tracing::instrument(skip(self, items), fields(count = items.len()))]
    pub async fn hydrate_all(&self, items: &[ContentItem]) -> HydrationReport {
        self.state.send_replace(HydrationState::Hydrating);
        self.resolver
            .ledger()
            .reopen(items.iter().map(|i| i.id.as_str()));
        let minted_before = self.resolver.ledger().len();

        let reports = join_all(items.iter().map(|item| self.hydrate_one(item))).await;

        let report = HydrationReport {
            items: reports,
            minted: self.resolver.ledger().len().saturating_sub(minted_before),
        };
        tracing::info!(
            resolved = report.resolved(),
            failed = report.failed(),
            skipped = report.skipped(),
            minted = report.minted,
            "Hydration complete"
        );
        self.state.send_replace(HydrationState::Ready);
        report
    }

    async fn hydrate_one(&self, item: &ContentItem) -> ItemReport {
        let outcome = if !self.needs_hydration(item).await {
            ItemOutcome::Skipped
        } else {
            match self.resolver.resolve_item(item).await {
                Ok(ResolveOutcome::Discarded(_)) => ItemOutcome::Discarded,
                Ok(outcome) => ItemOutcome::Resolved(outcome.into_resolution()),
                Err(e) => {
                    tracing::warn!(item_id = %item.id, error = %e, "Item unresolved");
                    let patch = ContentPatch::failed(MEDIA_UNAVAILABLE);
                    if let Err(update_err) = self.collection.update(&item.id, &patch).await {
                        tracing::warn!(item_id = %item.id, error = %update_err, "Failed to mark item as errored");
                    }
                    ItemOutcome::Failed(e)
                }
            }
        };
        ItemReport {
            item_id: item.id.clone(),
            outcome,
        }
    }

    /// Revoke every object URL this layer minted for `items`.
    ///
    /// URLs the items carried from elsewhere are left alone. A resolution
    /// still in flight for one of the items revokes its URL when it lands.
    /// Returns the number of revoke calls issued.
    #[tracing::instrument(skip(self, items), fields(count = items.len()))]
    pub fn revoke_all(&self, items: &[ContentItem]) -> usize {
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        let records = self.resolver.ledger().tear_down(ids.iter().copied());
        for record in &records {
            self.resolver.objects().revoke(record.url());
        }
        self.resolver.forget(ids);
        tracing::info!(revoked = records.len(), "Revoked minted object URLs");
        records.len()
    }

    /// Revoke every object URL this layer minted, for any item.
    pub fn revoke_everything(&self) -> usize {
        let records = self.resolver.ledger().tear_down_all();
        for record in &records {
            self.resolver.objects().revoke(record.url());
        }
        self.resolver
            .forget(records.iter().map(|r| r.item_id().as_str()));
        records.len()
    }
}
