//! Bookkeeping for object URLs minted by the resolver.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One minted URL and the item it was minted for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct MintRecord {
    item_id: String,
    url: String,
}

#[derive(Debug, Default)]
struct LedgerState {
    records: Vec<MintRecord>,
    torn_down: HashSet<String>,
    all_torn_down: bool,
}

impl LedgerState {
    fn is_torn_down(&self, item_id: &str) -> bool {
        self.all_torn_down || self.torn_down.contains(item_id)
    }
}

/// Record of the object URLs this layer created.
///
/// Resolution tasks append concurrently during a hydration pass. Entries are
/// only taken out by teardown, so only URLs listed here are ever revoked by
/// this layer.
///
/// Teardown also marks the items it covered. A mint that lands for a marked
/// item is refused, and the caller revokes it at once, so a resolution still
/// in flight when teardown runs cannot leave a live URL behind. Marks are
/// cleared when the item is hydrated again.
#[derive(Debug, Default)]
pub struct MintLedger {
    state: Mutex<LedgerState>,
}

impl MintLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that `url` was minted for `item_id`.
    ///
    /// Returns `false` without recording if the item has been torn down; the
    /// URL is then the caller's to revoke.
    pub fn record(&self, item_id: impl Into<String>, url: impl Into<String>) -> bool {
        let item_id = item_id.into();
        let mut state = self.state();
        if state.is_torn_down(&item_id) {
            return false;
        }
        state.records.push(MintRecord {
            item_id,
            url: url.into(),
        });
        true
    }

    /// Whether `url` was minted by this layer and not yet taken.
    pub fn contains(&self, url: &str) -> bool {
        self.state().records.iter().any(|r| r.url == url)
    }

    /// URLs minted for `item_id`, oldest first.
    pub fn minted_for(&self, item_id: &str) -> Vec<String> {
        self.state()
            .records
            .iter()
            .filter(|r| r.item_id == item_id)
            .map(|r| r.url.clone())
            .collect()
    }

    /// Number of outstanding records.
    pub fn len(&self) -> usize {
        self.state().records.len()
    }

    /// Whether nothing is outstanding.
    pub fn is_empty(&self) -> bool {
        self.state().records.is_empty()
    }

    /// Whether teardown has run for `item_id` since it was last reopened.
    pub fn is_torn_down(&self, item_id: &str) -> bool {
        self.state().is_torn_down(item_id)
    }

    /// Mark the given items as torn down and return their records.
    pub fn tear_down<'a>(&self, item_ids: impl IntoIterator<Item = &'a str>) -> Vec<MintRecord> {
        let mut state = self.state();
        let ids: HashSet<&str> = item_ids.into_iter().collect();
        state.torn_down.extend(ids.iter().map(|id| id.to_string()));
        let (taken, kept): (Vec<_>, Vec<_>) = state
            .records
            .drain(..)
            .partition(|r| ids.contains(r.item_id.as_str()));
        state.records = kept;
        taken
    }

    /// Mark every item as torn down and return every record.
    pub fn tear_down_all(&self) -> Vec<MintRecord> {
        let mut state = self.state();
        state.all_torn_down = true;
        std::mem::take(&mut state.records)
    }

    /// Accept mints for the given items again.
    ///
    /// Clears a blanket [`MintLedger::tear_down_all`] as well.
    pub fn reopen<'a>(&self, item_ids: impl IntoIterator<Item = &'a str>) {
        let mut state = self.state();
        state.all_torn_down = false;
        for id in item_ids {
            state.torn_down.remove(id);
        }
    }
}
