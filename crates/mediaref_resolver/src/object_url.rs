//! In-process object URL registry.

use mediaref_codec::parse_data_url;
use mediaref_core::Blob;
use mediaref_error::EncodingError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// How minted object URLs are spelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ObjectUrlNaming {
    /// `blob:<origin>/<uuid>`
    #[default]
    #[display("standard")]
    Standard,
    /// `blob:/blob-<n>`, as produced by hosts that drop the origin
    #[display("legacy")]
    Legacy,
}

/// Registry mapping `blob:` URLs to the bytes they stand for.
///
/// URLs stay valid until [`ObjectUrlStore::revoke`] is called. Every revoke
/// call is counted, including revokes of unknown URLs, so callers can audit
/// teardown.
///
/// # Examples
///
/// ```
/// use mediaref_core::Blob;
/// use mediaref_resolver::ObjectUrlStore;
///
/// let store = ObjectUrlStore::new("mediaref");
/// let url = store.create(&Blob::new(vec![1, 2, 3], "image/png"));
/// assert!(url.starts_with("blob:mediaref/"));
/// assert_eq!(store.get(&url).unwrap().len(), 3);
///
/// assert!(store.revoke(&url));
/// assert!(store.get(&url).is_none());
/// ```
#[derive(Debug)]
pub struct ObjectUrlStore {
    origin: String,
    naming: ObjectUrlNaming,
    urls: Mutex<HashMap<String, Blob>>,
    counter: AtomicU64,
    revoke_calls: AtomicUsize,
}

impl ObjectUrlStore {
    /// Store minting URLs under `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            naming: ObjectUrlNaming::Standard,
            urls: Mutex::new(HashMap::new()),
            counter: AtomicU64::new(0),
            revoke_calls: AtomicUsize::new(0),
        }
    }

    /// Use `naming` for newly minted URLs.
    pub fn with_naming(mut self, naming: ObjectUrlNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Naming scheme in use.
    pub fn naming(&self) -> ObjectUrlNaming {
        self.naming
    }

    fn urls(&self) -> MutexGuard<'_, HashMap<String, Blob>> {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mint a new URL for `blob`.
    pub fn create(&self, blob: &Blob) -> String {
        let url = match self.naming {
            ObjectUrlNaming::Standard => format!("blob:{}/{}", self.origin, Uuid::new_v4()),
            ObjectUrlNaming::Legacy => {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("blob:/blob-{}", n)
            }
        };
        tracing::debug!(url = %url, size = blob.len(), mime = blob.mime_type(), "Minted object URL");
        self.urls().insert(url.clone(), blob.clone());
        url
    }

    /// Release `url`. Returns whether it was live.
    pub fn revoke(&self, url: &str) -> bool {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        let removed = self.urls().remove(url).is_some();
        tracing::debug!(url, removed, "Revoked object URL");
        removed
    }

    /// Bytes behind a live URL.
    pub fn get(&self, url: &str) -> Option<Blob> {
        self.urls().get(url).cloned()
    }

    /// Whether `url` is live.
    pub fn contains(&self, url: &str) -> bool {
        self.urls().contains_key(url)
    }

    /// Number of live URLs.
    pub fn len(&self) -> usize {
        self.urls().len()
    }

    /// Whether no URLs are live.
    pub fn is_empty(&self) -> bool {
        self.urls().is_empty()
    }

    /// Number of revoke calls made so far.
    pub fn revoke_calls(&self) -> usize {
        self.revoke_calls.load(Ordering::SeqCst)
    }

    /// Turn a persisted data URL into a playable object URL.
    ///
    /// The returned URL is owned by the caller, who must revoke it.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`] if `data_url` is not a valid data URL.
    pub fn hydrate_data_url(&self, data_url: &str) -> Result<String, EncodingError> {
        let parsed = parse_data_url(data_url)?;
        Ok(self.create(&parsed.into_blob()))
    }
}
