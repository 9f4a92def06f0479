//! The reference resolution pipeline.

use crate::fetch::preview;
use crate::{
    BlobUrlValidator, ContentCollection, MintLedger, ObjectUrlStore, ResourceFetcher, UrlFetcher,
};
use mediaref_codec::encode_blob_data_url;
use mediaref_core::{
    Blob, ContentItem, ContentPatch, ItemStatus, PersistenceMethod, Resolution, ResolverConfig,
    Strategy, ThumbnailUpdate, UrlKind, is_well_formed_object_url,
};
use mediaref_error::ReferenceUnresolvedError;
use mediaref_storage::{FileLocation, LocalFileReader};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What happened to a resolution after it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The item was patched with the resolution
    Updated(Resolution),
    /// Nothing was written: the item already carried the resolution, or the
    /// write-back failed and was logged
    Current(Resolution),
    /// The item left the collection or was torn down while resolving; any
    /// minted URL was revoked
    Discarded(Resolution),
}

impl ResolveOutcome {
    /// The resolution, whatever happened to it.
    pub fn resolution(&self) -> &Resolution {
        match self {
            ResolveOutcome::Updated(r) | ResolveOutcome::Current(r) | ResolveOutcome::Discarded(r) => r,
        }
    }

    /// Consume the outcome and return the resolution.
    pub fn into_resolution(self) -> Resolution {
        match self {
            ResolveOutcome::Updated(r) | ResolveOutcome::Current(r) | ResolveOutcome::Discarded(r) => r,
        }
    }

    /// Whether the result was discarded.
    pub fn is_discarded(&self) -> bool {
        matches!(self, ResolveOutcome::Discarded(_))
    }
}

/// Turns a content item's candidate references into one renderable URL.
///
/// Strategies run strictly in order and the first success wins:
///
/// 1. A live primary `blob:`/`data:` reference is kept as is
/// 2. The local file is read and minted as a new object URL (`local`)
/// 3. A live backup `blob_url` is used (`blob`)
/// 4. A reachable remote URL is used directly (`presigned`)
/// 5. A dead primary object URL whose bytes can still be fetched is
///    re-encoded as a data URL (`dataUrl`)
///
/// The resolution is written back through the owning collection. Minted URLs
/// are recorded in the [`MintLedger`] once the write-back lands; if the item
/// has left the collection, or teardown ran for it meanwhile, the URL is
/// revoked instead.
pub struct ReferenceResolver {
    config: ResolverConfig,
    reader: LocalFileReader,
    validator: BlobUrlValidator,
    objects: Arc<ObjectUrlStore>,
    ledger: Arc<MintLedger>,
    collection: Arc<dyn ContentCollection>,
    cache: Mutex<HashMap<String, Resolution>>,
}

impl ReferenceResolver {
    /// Build a resolver.
    ///
    /// `remote` answers `http`/`https` references; `blob:` and `data:`
    /// references are answered from `objects` and the URLs themselves.
    #[tracing::instrument(skip_all, fields(origin = %config.object_url_origin()))]
    pub fn new(
        config: ResolverConfig,
        reader: LocalFileReader,
        objects: Arc<ObjectUrlStore>,
        remote: Arc<dyn ResourceFetcher>,
        collection: Arc<dyn ContentCollection>,
    ) -> Self {
        let fetcher = Arc::new(UrlFetcher::new(objects.clone(), remote));
        tracing::debug!(native = reader.has_native_reader(), "Creating reference resolver");
        Self {
            config,
            reader,
            validator: BlobUrlValidator::new(fetcher),
            objects,
            ledger: Arc::new(MintLedger::new()),
            collection,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Settings the resolver was built with.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Validator used for liveness probes.
    pub fn validator(&self) -> &BlobUrlValidator {
        &self.validator
    }

    /// Object URL store minted URLs live in.
    pub fn objects(&self) -> &Arc<ObjectUrlStore> {
        &self.objects
    }

    /// Ledger of URLs this resolver minted.
    pub fn ledger(&self) -> &Arc<MintLedger> {
        &self.ledger
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<String, Resolution>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop cached resolutions for the given items.
    pub fn forget<'a>(&self, item_ids: impl IntoIterator<Item = &'a str>) {
        let mut cache = self.cache();
        for id in item_ids {
            cache.remove(id);
        }
    }

    /// Resolve one item and write the result back.
    ///
    /// Calling this again for an item whose resolution is still live returns
    /// the same URL without minting a new one.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceUnresolvedError`] listing every attempted strategy
    /// when none succeeds.
    pub async fn resolve_one(&self, item: &ContentItem) -> Result<Resolution, ReferenceUnresolvedError> {
        self.resolve_item(item)
            .await
            .map(ResolveOutcome::into_resolution)
    }

    /// Resolve one item, reporting what happened to the write-back.
    ///
    /// # Errors
    ///
    /// See [`ReferenceResolver::resolve_one`].
    #[tracing::instrument(skip(self, item), fields(item_id = %item.id, content_type = %item.content_type))]
    pub async fn resolve_item(
        &self,
        item: &ContentItem,
    ) -> Result<ResolveOutcome, ReferenceUnresolvedError> {
        if let Some(cached) = self.cached(&item.id).await {
            tracing::debug!(url = preview(&cached.url), "Reusing cached resolution");
            return Ok(ResolveOutcome::Current(cached));
        }

        let resolution = self.find(item).await?;
        tracing::info!(
            strategy = %resolution.strategy,
            persistence_method = %resolution.persistence_method,
            minted = resolution.minted,
            "Resolved reference"
        );
        Ok(self.write_back(item, resolution).await)
    }

    async fn cached(&self, item_id: &str) -> Option<Resolution> {
        let cached = self.cache().get(item_id).cloned()?;
        if self.validator.is_live(&cached.url).await {
            Some(cached)
        } else {
            self.cache().remove(item_id);
            None
        }
    }

    async fn find(&self, item: &ContentItem) -> Result<Resolution, ReferenceUnresolvedError> {
        let mut attempts = Vec::new();

        let ephemeral: Vec<&str> = item
            .primary_candidates()
            .into_iter()
            .filter(|url| UrlKind::classify(url).is_ephemeral())
            .collect();
        for url in &ephemeral {
            if self.validator.is_live(url).await {
                let method = match UrlKind::classify(url) {
                    UrlKind::Data => PersistenceMethod::DataUrl,
                    _ if self.ledger.contains(url) => PersistenceMethod::Local,
                    _ => PersistenceMethod::Blob,
                };
                return Ok(Resolution::existing(*url, method, Strategy::Primary));
            }
        }
        attempts.push(attempt(
            Strategy::Primary,
            if ephemeral.is_empty() {
                "no ephemeral reference"
            } else {
                "dead"
            },
        ));

        let location = FileLocation::from_item(item);
        if location.is_empty() {
            attempts.push(attempt(Strategy::LocalFile, "no local coordinates"));
        } else {
            match self.reader.read(&location).await {
                Ok(file) => return Ok(self.mint(file.blob)),
                Err(e) => {
                    tracing::debug!(error = %e, "Local file strategy failed");
                    attempts.push(attempt(Strategy::LocalFile, &e.reason));
                }
            }
        }

        match item.blob_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) if UrlKind::classify(url).is_ephemeral() => {
                if self.validator.is_live(url).await {
                    return Ok(Resolution::existing(
                        url,
                        PersistenceMethod::Blob,
                        Strategy::BackupBlob,
                    ));
                }
                attempts.push(attempt(Strategy::BackupBlob, "dead"));
            }
            Some(_) => attempts.push(attempt(Strategy::BackupBlob, "not an ephemeral reference")),
            None => attempts.push(attempt(Strategy::BackupBlob, "none")),
        }

        let remotes = item.remote_candidates();
        for url in &remotes {
            if self.validator.is_reachable(url).await {
                return Ok(Resolution::existing(
                    *url,
                    PersistenceMethod::Presigned,
                    Strategy::Remote,
                ));
            }
        }
        attempts.push(attempt(
            Strategy::Remote,
            if remotes.is_empty() {
                "no remote reference"
            } else {
                "unreachable"
            },
        ));

        let dead_blobs: Vec<&str> = ephemeral
            .iter()
            .copied()
            .filter(|url| UrlKind::classify(url) == UrlKind::Blob)
            .collect();
        for url in &dead_blobs {
            if let Some(data_url) = self.validator.convert_to_durable(url).await {
                return Ok(Resolution::existing(
                    data_url,
                    PersistenceMethod::DataUrl,
                    Strategy::Converted,
                ));
            }
        }
        if !dead_blobs.is_empty() {
            attempts.push(attempt(Strategy::Converted, "bytes gone"));
        }

        tracing::warn!(attempts = ?attempts, "All resolution strategies exhausted");
        Err(ReferenceUnresolvedError::new(&item.id, attempts))
    }

    /// Mint an object URL for bytes read from disk.
    ///
    /// A malformed minted URL is revoked at once and the bytes are served as
    /// a data URL instead.
    fn mint(&self, blob: Blob) -> Resolution {
        let url = self.objects.create(&blob);
        if is_well_formed_object_url(&url) {
            return Resolution::minted(url, PersistenceMethod::Local);
        }
        tracing::warn!(url = %url, "Minted object URL is malformed, serving data URL");
        self.objects.revoke(&url);
        Resolution::existing(
            encode_blob_data_url(&blob),
            PersistenceMethod::Local,
            Strategy::LocalFile,
        )
    }

    async fn write_back(&self, item: &ContentItem, resolution: Resolution) -> ResolveOutcome {
        let patch = self.patch_for(item, &resolution).await;
        if patch.is_empty() {
            self.remember(item, &resolution);
            return ResolveOutcome::Current(resolution);
        }

        match self.collection.update(&item.id, &patch).await {
            Ok(true) => {
                if !self.keep_minted(item, &resolution) {
                    return ResolveOutcome::Discarded(resolution);
                }
                self.remember(item, &resolution);
                ResolveOutcome::Updated(resolution)
            }
            Ok(false) => {
                tracing::debug!("Item left the collection, discarding resolution");
                if resolution.minted {
                    self.objects.revoke(&resolution.url);
                }
                ResolveOutcome::Discarded(resolution)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Write-back failed");
                if !self.keep_minted(item, &resolution) {
                    return ResolveOutcome::Discarded(resolution);
                }
                ResolveOutcome::Current(resolution)
            }
        }
    }

    /// Record a minted URL in the ledger. If teardown already ran for the
    /// item the URL is revoked instead and `false` is returned.
    fn keep_minted(&self, item: &ContentItem, resolution: &Resolution) -> bool {
        if !resolution.minted || self.ledger.record(&item.id, &resolution.url) {
            return true;
        }
        tracing::debug!(url = %resolution.url, "Item torn down during resolution, revoking");
        self.objects.revoke(&resolution.url);
        false
    }

    fn remember(&self, item: &ContentItem, resolution: &Resolution) {
        self.cache().insert(item.id.clone(), resolution.clone());
    }

    async fn patch_for(&self, item: &ContentItem, resolution: &Resolution) -> ContentPatch {
        let url = resolution.url.as_str();
        let mut patch = ContentPatch::default();

        if item.display_url.as_deref() != Some(url) {
            patch.display_url = Some(url.to_string());
        }
        if item.is_video() {
            let runtime = item.runtime_url.as_deref().filter(|u| !u.trim().is_empty());
            let stale_runtime = runtime.is_some_and(|r| r != url);
            let stale_payload = item.content.is_some() && item.video_url() != Some(url);
            if stale_runtime || stale_payload {
                patch.video_url = Some(url.to_string());
            }
        }
        if item.persistence_method != resolution.persistence_method {
            patch.persistence_method = Some(resolution.persistence_method);
        }
        patch.thumbnail_url = self.thumbnail_update(item, url).await;
        if item.status == ItemStatus::Error {
            patch.status = Some(ItemStatus::Ready);
        }
        patch
    }

    /// Images get a missing or dead thumbnail replaced by the resolved URL;
    /// videos get a dead thumbnail cleared so the view shows its poster.
    async fn thumbnail_update(&self, item: &ContentItem, url: &str) -> ThumbnailUpdate {
        let thumbnail = item
            .thumbnail_url
            .as_deref()
            .filter(|t| !t.trim().is_empty());
        let dead = match thumbnail {
            Some(t) if t == url => false,
            Some(t) if UrlKind::classify(t).is_ephemeral() => !self.validator.is_live(t).await,
            _ => false,
        };

        if item.is_video() {
            return if dead {
                ThumbnailUpdate::Clear
            } else {
                ThumbnailUpdate::Keep
            };
        }
        if thumbnail.is_none() || dead {
            ThumbnailUpdate::Set(url.to_string())
        } else {
            ThumbnailUpdate::Keep
        }
    }
}

fn attempt(strategy: Strategy, reason: &str) -> String {
    format!("{}: {}", strategy, reason)
}
