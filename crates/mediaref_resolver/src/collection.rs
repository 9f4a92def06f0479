//! The collection that owns content items.

use mediaref_core::{ContentItem, ContentPatch};
use mediaref_error::MediarefResult;
use tokio::sync::RwLock;

/// Owner of the content items the resolver repairs.
#[async_trait::async_trait]
pub trait ContentCollection: Send + Sync {
    /// Apply `patch` to the item with `id`.
    ///
    /// Returns `false` when the item is no longer in the collection.
    async fn update(&self, id: &str, patch: &ContentPatch) -> MediarefResult<bool>;
}

/// Collection held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCollection {
    items: RwLock<Vec<ContentItem>>,
}

impl InMemoryCollection {
    /// Collection holding `items`.
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Snapshot of every item.
    pub async fn items(&self) -> Vec<ContentItem> {
        self.items.read().await.clone()
    }

    /// Snapshot of one item.
    pub async fn get(&self, id: &str) -> Option<ContentItem> {
        self.items.read().await.iter().find(|i| i.id == id).cloned()
    }

    /// Add an item, replacing any with the same id.
    pub async fn insert(&self, item: ContentItem) {
        let mut items = self.items.write().await;
        items.retain(|i| i.id != item.id);
        items.push(item);
    }

    /// Remove an item, returning it.
    pub async fn remove(&self, id: &str) -> Option<ContentItem> {
        let mut items = self.items.write().await;
        let index = items.iter().position(|i| i.id == id)?;
        Some(items.remove(index))
    }

    /// Number of items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ContentCollection for InMemoryCollection {
    #[tracing::instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: &ContentPatch) -> MediarefResult<bool> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.apply(patch);
                tracing::debug!("Applied patch");
                Ok(true)
            }
            None => {
                tracing::debug!("Item no longer in collection");
                Ok(false)
            }
        }
    }
}
