//! Collection whose write-backs wait for the test to release them.

use async_trait::async_trait;
use mediaref_core::{ContentItem, ContentPatch};
use mediaref_error::MediarefResult;
use mediaref_resolver::{ContentCollection, InMemoryCollection};
use tokio::sync::Notify;

pub struct GatedCollection {
    pub inner: InMemoryCollection,
    /// Signalled when an update starts waiting
    pub entered: Notify,
    /// Lets one waiting update through
    pub release: Notify,
}

#[allow(dead_code)]
impl GatedCollection {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self {
            inner: InMemoryCollection::new(items),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl ContentCollection for GatedCollection {
    async fn update(&self, id: &str, patch: &ContentPatch) -> MediarefResult<bool> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.update(id, patch).await
    }
}
