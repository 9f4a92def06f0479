//! Fetching the bytes behind a reference.

use crate::ObjectUrlStore;
use mediaref_codec::parse_data_url;
use mediaref_core::UrlKind;
use mediaref_error::{HttpError, MediarefResult};
use std::sync::Arc;
use std::time::Duration;

/// Bytes and content type returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    /// Response body
    pub bytes: Vec<u8>,
    /// Content type reported by the source
    pub content_type: Option<String>,
}

/// Existence probes and full fetches for media references.
#[async_trait::async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Lightweight existence probe. `Ok` means the reference answered with success.
    async fn head(&self, url: &str) -> MediarefResult<()>;

    /// Fetch the full resource.
    async fn get(&self, url: &str) -> MediarefResult<FetchedResource>;
}

/// Fetcher for `http`/`https` references.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[tracing::instrument]
    pub fn new(timeout: Duration) -> MediarefResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ResourceFetcher for HttpFetcher {
    #[tracing::instrument(skip(self))]
    async fn head(&self, url: &str) -> MediarefResult<()> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("HEAD {} failed: {}", url, e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            tracing::debug!(%status, "Probe returned non-success status");
            Err(HttpError::status(status.as_u16(), format!("HEAD {} returned {}", url, status)).into())
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, url: &str) -> MediarefResult<FetchedResource> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(
                HttpError::status(status.as_u16(), format!("GET {} returned {}", url, status))
                    .into(),
            );
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read body of {}: {}", url, e)))?;

        tracing::debug!(size = bytes.len(), "Fetched remote resource");
        Ok(FetchedResource {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Routes each reference to the mechanism that can answer it.
///
/// - `blob:` URLs are looked up in the object URL store
/// - `data:` URLs are answered from their own payload
/// - `http`/`https` URLs go to the remote fetcher
pub struct UrlFetcher {
    objects: Arc<ObjectUrlStore>,
    remote: Arc<dyn ResourceFetcher>,
}

impl UrlFetcher {
    /// Fetcher over `objects` for `blob:` URLs and `remote` for network URLs.
    pub fn new(objects: Arc<ObjectUrlStore>, remote: Arc<dyn ResourceFetcher>) -> Self {
        Self { objects, remote }
    }
}

fn not_found(url: &str) -> HttpError {
    HttpError::status(404, format!("No resource behind {}", preview(url)))
}

fn unsupported(url: &str) -> HttpError {
    HttpError::new(format!("Unsupported reference: {}", preview(url)))
}

/// First 48 characters of a URL, for logs.
pub(crate) fn preview(url: &str) -> &str {
    match url.char_indices().nth(48) {
        Some((end, _)) => &url[..end],
        None => url,
    }
}

#[async_trait::async_trait]
impl ResourceFetcher for UrlFetcher {
    async fn head(&self, url: &str) -> MediarefResult<()> {
        match UrlKind::classify(url) {
            UrlKind::Blob if self.objects.contains(url) => Ok(()),
            UrlKind::Blob => Err(not_found(url).into()),
            UrlKind::Data => {
                parse_data_url(url)?;
                Ok(())
            }
            UrlKind::Remote => self.remote.head(url).await,
            UrlKind::Other => Err(unsupported(url).into()),
        }
    }

    async fn get(&self, url: &str) -> MediarefResult<FetchedResource> {
        match UrlKind::classify(url) {
            UrlKind::Blob => {
                let blob = self.objects.get(url).ok_or_else(|| not_found(url))?;
                Ok(FetchedResource {
                    bytes: blob.bytes().to_vec(),
                    content_type: Some(blob.mime_type().to_string()),
                })
            }
            UrlKind::Data => {
                let parsed = parse_data_url(url)?;
                Ok(FetchedResource {
                    bytes: parsed.bytes,
                    content_type: Some(parsed.mime_type),
                })
            }
            UrlKind::Remote => self.remote.get(url).await,
            UrlKind::Other => Err(unsupported(url).into()),
        }
    }
}
