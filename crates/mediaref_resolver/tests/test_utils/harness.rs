//! Resolver wired over a temporary granted folder.

use super::MockRemote;
use mediaref_core::{ContentItem, ContentType, ResolverConfig};
use mediaref_resolver::{
    InMemoryCollection, MediaLifecycle, ObjectUrlNaming, ObjectUrlStore, ReferenceResolver,
};
use mediaref_storage::{LocalFileReader, SandboxedFolderHost};
use std::sync::Arc;
use tempfile::TempDir;

#[allow(dead_code)]
pub struct Harness {
    pub dir: TempDir,
    pub token: String,
    pub objects: Arc<ObjectUrlStore>,
    pub remote: Arc<MockRemote>,
    pub collection: Arc<InMemoryCollection>,
    pub resolver: Arc<ReferenceResolver>,
    pub lifecycle: MediaLifecycle,
}

#[allow(dead_code)]
impl Harness {
    /// Harness with `items` in the collection and the standard naming.
    pub async fn new(items: Vec<ContentItem>) -> Self {
        Self::with_naming(items, ObjectUrlNaming::Standard).await
    }

    pub async fn with_naming(items: Vec<ContentItem>, naming: ObjectUrlNaming) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("clips")).unwrap();
        std::fs::write(dir.path().join("clips").join("a.mp4"), b"fresh video").unwrap();
        std::fs::write(dir.path().join("still.png"), b"fresh image").unwrap();

        let host = Arc::new(SandboxedFolderHost::new());
        host.register("tok1", dir.path()).await.unwrap();

        let config = ResolverConfig::default();
        let reader = LocalFileReader::new(host, &config);
        let objects = Arc::new(ObjectUrlStore::new("mediaref").with_naming(naming));
        let remote = Arc::new(MockRemote::new());
        let collection = Arc::new(InMemoryCollection::new(items));
        let resolver = Arc::new(ReferenceResolver::new(
            config,
            reader,
            objects.clone(),
            remote.clone(),
            collection.clone(),
        ));
        let lifecycle = MediaLifecycle::new(resolver.clone(), collection.clone());

        Self {
            dir,
            token: "tok1".to_string(),
            objects,
            remote,
            collection,
            resolver,
            lifecycle,
        }
    }
}

/// Video whose display URL is a dead object URL but whose file is on disk.
#[allow(dead_code)]
pub fn stale_video(id: &str) -> ContentItem {
    ContentItem::builder()
        .id(id)
        .content_type(ContentType::Video)
        .display_url("blob:abc123")
        .folder_token("tok1")
        .relative_path("clips/a.mp4")
        .build()
        .unwrap()
}

/// Item with no references at all.
#[allow(dead_code)]
pub fn broken(id: &str) -> ContentItem {
    ContentItem::builder()
        .id(id)
        .content_type(ContentType::GeneratedImage)
        .build()
        .unwrap()
}
