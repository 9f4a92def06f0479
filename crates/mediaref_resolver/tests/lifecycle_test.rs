mod test_utils;

use mediaref_core::{Blob, ContentItem, ContentType, ItemStatus, PersistenceMethod, ResolverConfig};
use mediaref_resolver::{
    HydrationState, ItemOutcome, MEDIA_UNAVAILABLE, MediaLifecycle, ObjectUrlStore,
    ReferenceResolver,
};
use mediaref_storage::{LocalFileReader, SandboxedFolderHost};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{GatedCollection, Harness, MockRemote};
use test_utils::harness::{broken, stale_video};

#[tokio::test]
async fn test_revoke_all_only_revokes_minted_urls() {
    let mut items: Vec<ContentItem> = (0..3).map(|i| stale_video(&format!("vid-{}", i))).collect();
    let h = Harness::new(Vec::new()).await;

    let external = h.objects.create(&Blob::new(b"ext".to_vec(), "image/png"));
    items.push(
        ContentItem::builder()
            .id("external")
            .content_type(ContentType::UploadedImage)
            .display_url(external.clone())
            .build()
            .unwrap(),
    );
    items.push(
        ContentItem::builder()
            .id("data")
            .content_type(ContentType::UploadedImage)
            .display_url("data:image/png;base64,AAAA")
            .build()
            .unwrap(),
    );
    for item in &items {
        h.collection.insert(item.clone()).await;
    }

    let report = h.lifecycle.hydrate_all(&items).await;
    assert_eq!(report.minted, 3);
    assert_eq!(report.resolved(), 3);
    assert_eq!(report.skipped(), 2);
    assert_eq!(h.objects.revoke_calls(), 0);

    let revoked = h.lifecycle.revoke_all(&items);

    assert_eq!(revoked, 3);
    assert_eq!(h.objects.revoke_calls(), 3);
    assert!(h.objects.contains(&external));
    assert_eq!(h.objects.len(), 1);
    assert!(h.resolver.ledger().is_empty());

    // A second teardown has nothing left to revoke
    assert_eq!(h.lifecycle.revoke_all(&items), 0);
    assert_eq!(h.objects.revoke_calls(), 3);
}

#[tokio::test]
async fn test_partial_failure_does_not_abort_batch() {
    let items = vec![
        stale_video("vid-0"),
        stale_video("vid-1"),
        broken("img-broken"),
        stale_video("vid-2"),
    ];
    let h = Harness::new(items.clone()).await;

    let report = h.lifecycle.hydrate_all(&items).await;

    assert_eq!(report.items.len(), 4);
    assert_eq!(report.resolved(), 3);
    assert_eq!(report.failed(), 1);
    match report.get("img-broken") {
        Some(ItemOutcome::Failed(e)) => assert_eq!(e.item_id, "img-broken"),
        other => panic!("expected failure, got {:?}", other),
    }

    let failed = h.collection.get("img-broken").await.unwrap();
    assert_eq!(failed.status, ItemStatus::Error);
    assert_eq!(failed.error_message.as_deref(), Some(MEDIA_UNAVAILABLE));

    for id in ["vid-0", "vid-1", "vid-2"] {
        let item = h.collection.get(id).await.unwrap();
        assert_eq!(item.persistence_method, PersistenceMethod::Local);
        assert_eq!(item.status, ItemStatus::Ready);
    }
}

#[tokio::test]
async fn test_hydration_gate_opens_after_pass() {
    let items = vec![stale_video("vid-0"), broken("img-broken")];
    let h = Harness::new(items.clone()).await;
    assert_eq!(h.lifecycle.state(), HydrationState::Idle);

    let mut rx = h.lifecycle.subscribe();
    let (report, ()) = tokio::join!(h.lifecycle.hydrate_all(&items), async {
        tokio::time::timeout(Duration::from_secs(5), h.lifecycle.wait_ready())
            .await
            .unwrap()
    });

    assert_eq!(report.items.len(), 2);
    assert_eq!(h.lifecycle.state(), HydrationState::Ready);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), HydrationState::Ready);
}

#[tokio::test]
async fn test_items_removed_mid_hydration_are_discarded() {
    let items = vec![stale_video("vid-0"), stale_video("vid-gone")];
    let h = Harness::new(vec![items[0].clone()]).await;

    let report = h.lifecycle.hydrate_all(&items).await;

    assert!(matches!(report.get("vid-gone"), Some(ItemOutcome::Discarded)));
    assert_eq!(report.minted, 1);
    assert_eq!(h.objects.len(), 1);
    assert_eq!(h.lifecycle.revoke_everything(), 1);
    assert!(h.objects.is_empty());
}

#[tokio::test]
async fn test_needs_hydration() {
    let h = Harness::new(Vec::new()).await;
    let live = h.objects.create(&Blob::new(vec![1], "image/png"));

    let with_display = |url: &str| {
        ContentItem::builder()
            .id("x")
            .content_type(ContentType::GeneratedImage)
            .display_url(url)
            .build()
            .unwrap()
    };

    assert!(h.lifecycle.needs_hydration(&broken("x")).await);
    assert!(h.lifecycle.needs_hydration(&with_display("blob:mediaref/dead")).await);
    assert!(h.lifecycle.needs_hydration(&with_display("blob:/blob-1")).await);
    assert!(!h.lifecycle.needs_hydration(&with_display(live.as_str())).await);
    assert!(!h.lifecycle.needs_hydration(&with_display("https://cdn.example/a.png")).await);
}

#[tokio::test]
async fn test_teardown_during_write_back_revokes_late_mint() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("clips")).unwrap();
    std::fs::write(dir.path().join("clips").join("a.mp4"), b"fresh video").unwrap();
    let host = Arc::new(SandboxedFolderHost::new());
    host.register("tok1", dir.path()).await.unwrap();

    let items = vec![stale_video("vid-0")];
    let config = ResolverConfig::default();
    let reader = LocalFileReader::new(host, &config);
    let objects = Arc::new(ObjectUrlStore::new("mediaref"));
    let collection = Arc::new(GatedCollection::new(items.clone()));
    let resolver = Arc::new(ReferenceResolver::new(
        config,
        reader,
        objects.clone(),
        Arc::new(MockRemote::new()),
        collection.clone(),
    ));
    let lifecycle = MediaLifecycle::new(resolver.clone(), collection.clone());

    let (report, revoked_at_teardown) = tokio::join!(lifecycle.hydrate_all(&items), async {
        collection.entered.notified().await;
        // Minted, write-back still pending
        assert_eq!(objects.len(), 1);
        let revoked = lifecycle.revoke_all(&items);
        collection.release.notify_one();
        revoked
    });

    assert_eq!(revoked_at_teardown, 0);
    assert!(matches!(report.get("vid-0"), Some(ItemOutcome::Discarded)));
    assert_eq!(report.minted, 0);
    assert!(objects.is_empty());
    assert_eq!(objects.revoke_calls(), 1);
    assert!(resolver.ledger().is_empty());
    assert!(resolver.ledger().is_torn_down("vid-0"));
    assert_eq!(lifecycle.revoke_all(&items), 0);

    // Hydrating again accepts new mints for the item
    collection.release.notify_one();
    let report = lifecycle.hydrate_all(&items).await;
    assert_eq!(report.minted, 1);
    assert!(!resolver.ledger().is_torn_down("vid-0"));
    assert_eq!(lifecycle.revoke_all(&items), 1);
    assert!(objects.is_empty());
}
