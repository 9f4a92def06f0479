//! Tests for the engine wiring.

use async_trait::async_trait;
use mediaref::{
    FetchedResource, FolderGrant, HttpError, ItemOutcome, MediaEngine, MediarefConfig,
    MediarefResult, NativeReaderConfig, PersistenceMethod, ResolverConfig, ResourceFetcher,
    Strategy,
};
use std::sync::Arc;

const CDN_URL: &str = "https://cdn.example/cloud.png";

/// Remote that answers only for the CDN fixture.
struct CdnOnly;

#[async_trait]
impl ResourceFetcher for CdnOnly {
    async fn head(&self, url: &str) -> MediarefResult<()> {
        if url == CDN_URL {
            Ok(())
        } else {
            Err(HttpError::status(404, url).into())
        }
    }

    async fn get(&self, url: &str) -> MediarefResult<FetchedResource> {
        Err(HttpError::status(404, url).into())
    }
}

const ITEMS: &str = r#"[
    {
        "id": "local",
        "contentType": "generated-image",
        "displayUrl": "blob:mediaref/stale",
        "folderToken": "tok1",
        "relativePath": "2024-05-01/still.png"
    },
    {
        "id": "cloud",
        "contentType": "uploaded-image",
        "displayUrl": "https://cdn.example/cloud.png"
    },
    {
        "id": "gone",
        "contentType": "video",
        "displayUrl": "blob:mediaref/dead",
        "folderToken": "tok1",
        "relativePath": "missing.mp4"
    }
]"#;

struct Fixture {
    _dir: tempfile::TempDir,
    engine: MediaEngine,
}

async fn fixture(native: bool) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("2024-05-01")).unwrap();
    std::fs::write(dir.path().join("2024-05-01/still.png"), b"png bytes").unwrap();

    let items_path = dir.path().join("items.json");
    std::fs::write(&items_path, ITEMS).unwrap();

    let root = dir.path().to_string_lossy().to_string();
    let mut resolver = ResolverConfig::default();
    if native {
        resolver = resolver
            .with_base_folder_token("tok1".to_string())
            .with_base_folder_path(root.clone());
    }
    let config = MediarefConfig::default()
        .with_resolver(resolver)
        .with_folders(vec![FolderGrant::new("tok1", root)])
        .with_native_reader(NativeReaderConfig::default().with_enabled(native));

    let items = MediaEngine::load_items(&items_path).await.unwrap();
    let engine = MediaEngine::with_fetcher(&config, items, Arc::new(CdnOnly))
        .await
        .unwrap();
    Fixture { _dir: dir, engine }
}

#[tokio::test]
async fn test_load_items_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    std::fs::write(&path, "{ not an array").unwrap();

    assert!(MediaEngine::load_items(&path).await.is_err());
    assert!(
        MediaEngine::load_items(dir.path().join("absent.json"))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_configured_folders_are_granted() {
    let f = fixture(false).await;
    assert_eq!(f.engine.host().grant_count().await, 1);
    assert_eq!(f.engine.items().await.len(), 3);
}

#[tokio::test]
async fn test_unknown_folder_fails_startup() {
    let config = MediarefConfig::default()
        .with_folders(vec![FolderGrant::new("tok1", "/definitely/not/here")]);
    let result = MediaEngine::with_fetcher(&config, Vec::new(), Arc::new(CdnOnly)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_hydrate_all_reports_each_item() {
    let f = fixture(false).await;

    let report = f.engine.hydrate_all().await;

    assert_eq!(report.resolved(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.minted, 1);

    match report.get("local").unwrap() {
        ItemOutcome::Resolved(resolution) => {
            assert_eq!(resolution.strategy, Strategy::LocalFile);
            assert_eq!(resolution.persistence_method, PersistenceMethod::Local);
            assert!(resolution.url.starts_with("blob:mediaref/"));
            let blob = f.engine.objects().get(&resolution.url).unwrap();
            assert_eq!(blob.bytes(), b"png bytes");
            assert_eq!(blob.mime_type(), "image/png");
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(matches!(
        report.get("cloud").unwrap(),
        ItemOutcome::Skipped
    ));
    assert!(matches!(
        report.get("gone").unwrap(),
        ItemOutcome::Failed(_)
    ));

    let items = f.engine.items().await;
    let gone = items.iter().find(|i| i.id == "gone").unwrap();
    assert_eq!(gone.error_message.as_deref(), Some("media unavailable"));
}

#[tokio::test]
async fn test_native_reader_serves_same_bytes() {
    let f = fixture(true).await;

    let resolution = f.engine.resolve("local").await.unwrap().unwrap();

    assert_eq!(resolution.strategy, Strategy::LocalFile);
    let blob = f.engine.objects().get(&resolution.url).unwrap();
    assert_eq!(blob.bytes(), b"png bytes");
}

#[tokio::test]
async fn test_resolve_single_item() {
    let f = fixture(false).await;

    let cloud = f.engine.resolve("cloud").await.unwrap().unwrap();
    assert_eq!(cloud.strategy, Strategy::Remote);
    assert_eq!(cloud.persistence_method, PersistenceMethod::Presigned);
    assert_eq!(cloud.url, CDN_URL);

    assert!(f.engine.resolve("nobody").await.unwrap().is_none());
    let err = f.engine.item("nobody").await.unwrap_err();
    assert!(err.to_string().contains("content item 'nobody'"));
    assert_eq!(f.engine.item("cloud").await.unwrap().id, "cloud");

    let err = f.engine.resolve("gone").await.unwrap_err();
    assert_eq!(err.item_id, "gone");
    assert!(!err.attempts.is_empty());
}

#[tokio::test]
async fn test_revoke_all_releases_minted_urls() {
    let f = fixture(false).await;
    f.engine.hydrate_all().await;
    assert_eq!(f.engine.objects().len(), 1);

    assert_eq!(f.engine.revoke_all().await, 1);
    assert!(f.engine.objects().is_empty());
    assert_eq!(f.engine.revoke_all().await, 0);
}
