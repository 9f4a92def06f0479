//! Liveness checks for ephemeral references and conversion to durable ones.

use crate::ResourceFetcher;
use crate::fetch::preview;
use futures::future::join_all;
use mediaref_codec::encode_data_url;
use mediaref_core::{UrlKind, is_well_formed_object_url};
use std::sync::Arc;

/// Probes references and rescues the bytes behind dead object URLs.
///
/// None of these operations fail: a probe error means "not live" and a
/// failed conversion yields `None`.
#[derive(Clone)]
pub struct BlobUrlValidator {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl BlobUrlValidator {
    /// Validator probing through `fetcher`.
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Whether `url` is a well-formed `blob:` URL that answers a probe.
    #[tracing::instrument(skip(self), fields(url = preview(url)))]
    pub async fn is_valid(&self, url: &str) -> bool {
        if !is_well_formed_object_url(url) {
            tracing::debug!("Not a well-formed object URL");
            return false;
        }
        match self.fetcher.head(url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Object URL is dead");
                false
            }
        }
    }

    /// Whether an ephemeral reference can still be rendered.
    ///
    /// Object URLs are probed; data URLs are live when they carry a payload.
    /// Anything else is not ephemeral and reports `false`.
    pub async fn is_live(&self, url: &str) -> bool {
        match UrlKind::classify(url) {
            UrlKind::Blob => self.is_valid(url).await,
            UrlKind::Data => self.fetcher.head(url).await.is_ok(),
            UrlKind::Remote | UrlKind::Other => false,
        }
    }

    /// Whether a remote reference answers an existence probe.
    #[tracing::instrument(skip(self))]
    pub async fn is_reachable(&self, url: &str) -> bool {
        if UrlKind::classify(url) != UrlKind::Remote {
            return false;
        }
        match self.fetcher.head(url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Remote reference unreachable");
                false
            }
        }
    }

    /// Re-encode the resource behind `url` as a data URL.
    ///
    /// Returns `None` if the resource cannot be fetched, so the caller can
    /// keep the stale reference.
    #[tracing::instrument(skip(self), fields(url = preview(url)))]
    pub async fn convert_to_durable(&self, url: &str) -> Option<String> {
        match self.fetcher.get(url).await {
            Ok(resource) => {
                let mime_type = resource.content_type.as_deref().unwrap_or_default();
                tracing::debug!(size = resource.bytes.len(), "Converted to data URL");
                Some(encode_data_url(&resource.bytes, mime_type))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Conversion to data URL failed");
                None
            }
        }
    }

    /// Keep a live object URL, convert a dead one, and pass anything else through.
    ///
    /// When conversion fails the original URL is returned unchanged.
    pub async fn refresh_url_if_needed(&self, url: &str) -> String {
        if UrlKind::classify(url) != UrlKind::Blob || self.is_valid(url).await {
            return url.to_string();
        }
        self.convert_to_durable(url)
            .await
            .unwrap_or_else(|| url.to_string())
    }

    /// Refresh many URLs concurrently, preserving order.
    pub async fn refresh_urls(&self, urls: &[String]) -> Vec<String> {
        join_all(urls.iter().map(|url| self.refresh_url_if_needed(url))).await
    }
}
