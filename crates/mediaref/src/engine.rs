//! Engine wiring.

use crate::MediarefConfig;
use mediaref_core::{ContentItem, Resolution};
use mediaref_error::{
    JsonError, MediarefResult, ReferenceUnresolvedError, StorageError, StorageErrorKind,
};
use mediaref_resolver::{
    HttpFetcher, HydrationReport, InMemoryCollection, MediaLifecycle, ObjectUrlStore,
    ReferenceResolver, ResourceFetcher,
};
use mediaref_storage::{DirectPathReader, LocalFileReader, SandboxedFolderHost};
use std::path::Path;
use std::sync::Arc;

/// A resolver, lifecycle and in-memory collection wired from configuration.
///
/// # Example
///
/// ```no_run
/// use mediaref::{MediaEngine, MediarefConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MediarefConfig::load()?;
/// let items = MediaEngine::load_items("items.json").await?;
/// let engine = MediaEngine::new(&config, items).await?;
///
/// let report = engine.hydrate_all().await;
/// println!("{} resolved, {} failed", report.resolved(), report.failed());
///
/// engine.revoke_all().await;
/// # Ok(())
/// # }
/// ```
pub struct MediaEngine {
    host: Arc<SandboxedFolderHost>,
    objects: Arc<ObjectUrlStore>,
    collection: Arc<InMemoryCollection>,
    resolver: Arc<ReferenceResolver>,
    lifecycle: MediaLifecycle,
}

impl MediaEngine {
    /// Build an engine that probes remote references over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured folder cannot be granted or the HTTP
    /// client cannot be built.
    pub async fn new(config: &MediarefConfig, items: Vec<ContentItem>) -> MediarefResult<Self> {
        let remote = Arc::new(HttpFetcher::new(config.resolver().probe_timeout())?);
        Self::with_fetcher(config, items, remote).await
    }

    /// Build an engine with a custom remote fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured folder cannot be granted.
    #[tracing::instrument(skip_all, fields(items = items.len(), folders = config.folders().len()))]
    pub async fn with_fetcher(
        config: &MediarefConfig,
        items: Vec<ContentItem>,
        remote: Arc<dyn ResourceFetcher>,
    ) -> MediarefResult<Self> {
        let host = Arc::new(SandboxedFolderHost::new());
        for grant in config.folders() {
            host.register(grant.token(), grant.path()).await?;
        }

        let resolver_config = config.resolver().clone();
        let mut reader = LocalFileReader::new(host.clone(), &resolver_config);
        if *config.native_reader().enabled() {
            reader = reader.with_native_reader(Arc::new(DirectPathReader::new()));
        }

        let objects = Arc::new(ObjectUrlStore::new(
            resolver_config.object_url_origin().clone(),
        ));
        let collection = Arc::new(InMemoryCollection::new(items));
        let resolver = Arc::new(ReferenceResolver::new(
            resolver_config,
            reader,
            objects.clone(),
            remote,
            collection.clone(),
        ));
        let lifecycle = MediaLifecycle::new(resolver.clone(), collection.clone());

        tracing::info!("Media engine ready");
        Ok(Self {
            host,
            objects,
            collection,
            resolver,
            lifecycle,
        })
    }

    /// Read content items from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of
    /// content items.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load_items(path: impl AsRef<Path>) -> MediarefResult<Vec<ContentItem>> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let items: Vec<ContentItem> = serde_json::from_str(&text)
            .map_err(|e| JsonError::new(format!("Failed to parse {}: {}", path.display(), e)))?;
        tracing::debug!(count = items.len(), "Loaded content items");
        Ok(items)
    }

    /// Hydrate every item in the collection.
    pub async fn hydrate_all(&self) -> HydrationReport {
        let items = self.collection.items().await;
        self.lifecycle.hydrate_all(&items).await
    }

    /// Resolve one item by id.
    ///
    /// Returns `None` if no item has that id.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceUnresolvedError`] if every strategy fails.
    pub async fn resolve(&self, id: &str) -> Result<Option<Resolution>, ReferenceUnresolvedError> {
        match self.collection.get(id).await {
            Some(item) => self.resolver.resolve_one(&item).await.map(Some),
            None => Ok(None),
        }
    }

    /// Revoke every object URL minted for the collection's items.
    pub async fn revoke_all(&self) -> usize {
        let items = self.collection.items().await;
        self.lifecycle.revoke_all(&items)
    }

    /// Snapshot of one item.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if no item has that id.
    pub async fn item(&self, id: &str) -> MediarefResult<ContentItem> {
        self.collection.get(id).await.ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound(format!("content item '{}'", id))).into()
        })
    }

    /// Snapshot of the collection.
    pub async fn items(&self) -> Vec<ContentItem> {
        self.collection.items().await
    }

    /// Folder host holding the configured grants.
    pub fn host(&self) -> &Arc<SandboxedFolderHost> {
        &self.host
    }

    /// Object URL store.
    pub fn objects(&self) -> &Arc<ObjectUrlStore> {
        &self.objects
    }

    /// Collection of items.
    pub fn collection(&self) -> &Arc<InMemoryCollection> {
        &self.collection
    }

    /// Hydration and teardown hooks.
    pub fn lifecycle(&self) -> &MediaLifecycle {
        &self.lifecycle
    }
}
