//! Mock remote fetcher.

use async_trait::async_trait;
use mediaref_error::{HttpError, MediarefResult};
use mediaref_resolver::{FetchedResource, ResourceFetcher};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Remote fetcher answering only for URLs it was told about.
#[derive(Default)]
pub struct MockRemote {
    resources: Mutex<HashMap<String, FetchedResource>>,
    head_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `url` reachable with `bytes`.
    pub fn serve(&self, url: &str, bytes: &[u8], content_type: &str) {
        self.resources.lock().unwrap().insert(
            url.to_string(),
            FetchedResource {
                bytes: bytes.to_vec(),
                content_type: Some(content_type.to_string()),
            },
        );
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceFetcher for MockRemote {
    async fn head(&self, url: &str) -> MediarefResult<()> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if self.resources.lock().unwrap().contains_key(url) {
            Ok(())
        } else {
            Err(HttpError::status(404, url).into())
        }
    }

    async fn get(&self, url: &str) -> MediarefResult<FetchedResource> {
        self.resources
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::status(404, url).into())
    }
}
