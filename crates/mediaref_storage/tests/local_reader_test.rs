use async_trait::async_trait;
use mediaref_core::{ContentItem, ContentType, ResolverConfig};
use mediaref_error::{MediarefResult, StorageError, StorageErrorKind};
use mediaref_storage::{
    BinaryResult, DirectPathReader, Entry, EntryKind, FileLocation, FolderHost, LocalFileReader,
    NativeFileReader, NativeRead, ReadFormat, ReadSource, SandboxedFolderHost, mime_for_path,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    host: Arc<SandboxedFolderHost>,
    token: String,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("clips")).unwrap();
    std::fs::write(dir.path().join("clips").join("a.mp4"), b"video").unwrap();
    std::fs::write(dir.path().join("still.PNG"), b"image").unwrap();
    std::fs::write(dir.path().join("notes.bin"), b"raw").unwrap();
    let host = Arc::new(SandboxedFolderHost::new());
    let token = host.grant(dir.path()).await.unwrap();
    Fixture { dir, host, token }
}

/// Native reader that always fails, counting calls.
#[derive(Default)]
struct BrokenNative {
    calls: AtomicUsize,
}

#[async_trait]
impl NativeFileReader for BrokenNative {
    async fn read_file(&self, path: &Path) -> MediarefResult<NativeRead> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::new(StorageErrorKind::Unavailable(path.display().to_string())).into())
    }
}

/// Host that only hands back offset views and ignores binary reads.
struct ViewOnlyHost {
    root: PathBuf,
}

#[async_trait]
impl FolderHost for ViewOnlyHost {
    async fn folder_for_token(&self, token: &str) -> MediarefResult<Entry> {
        if token != "view" {
            return Err(StorageError::new(StorageErrorKind::InvalidToken(token.to_string())).into());
        }
        Ok(Entry {
            name: String::new(),
            kind: EntryKind::Folder,
            native_path: self.root.clone(),
        })
    }

    async fn child(&self, folder: &Entry, name: &str) -> MediarefResult<Entry> {
        let path = folder.native_path.join(name);
        if !path.exists() {
            return Err(StorageError::new(StorageErrorKind::NotFound(name.to_string())).into());
        }
        let kind = if path.is_dir() {
            EntryKind::Folder
        } else {
            EntryKind::File
        };
        Ok(Entry {
            name: name.to_string(),
            kind,
            native_path: path,
        })
    }

    async fn read(&self, file: &Entry, format: ReadFormat) -> MediarefResult<BinaryResult> {
        assert_eq!(format, ReadFormat::Default);
        let data = std::fs::read(&file.native_path).unwrap();
        let byte_length = data.len();
        let mut buffer = vec![0xAA; 3];
        buffer.extend(data);
        buffer.push(0xBB);
        Ok(BinaryResult::TypedArrayView {
            buffer,
            byte_offset: 3,
            byte_length,
        })
    }

    fn supports_binary_format(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn test_folder_walk_reads_bytes_with_mime() {
    let fx = fixture().await;
    let reader = LocalFileReader::new(fx.host.clone(), &ResolverConfig::default());

    let file = reader
        .read(&FileLocation::in_folder(&fx.token, "clips/a.mp4"))
        .await
        .unwrap();

    assert_eq!(file.source, ReadSource::FolderWalk);
    assert_eq!(file.blob.bytes(), b"video");
    assert_eq!(file.blob.mime_type(), "video/mp4");
}

#[tokio::test]
async fn test_windows_separators_and_base_prefix() {
    let fx = fixture().await;
    let base = fx.dir.path().display().to_string();
    let config = ResolverConfig::builder()
        .base_folder_path(base.clone())
        .build()
        .unwrap();
    let reader = LocalFileReader::new(fx.host.clone(), &config);

    let with_prefix = format!("{}/clips/a.mp4", base);
    let file = reader
        .read(&FileLocation::in_folder(&fx.token, with_prefix))
        .await
        .unwrap();
    assert_eq!(file.blob.bytes(), b"video");

    let file = reader
        .read(&FileLocation::in_folder(&fx.token, "clips\\a.mp4"))
        .await
        .unwrap();
    assert_eq!(file.blob.bytes(), b"video");
}

#[tokio::test]
async fn test_base_token_used_when_item_has_none() {
    let fx = fixture().await;
    let config = ResolverConfig::builder()
        .base_folder_token(fx.token.clone())
        .build()
        .unwrap();
    let reader = LocalFileReader::new(fx.host.clone(), &config);

    let item = ContentItem::builder()
        .id("img")
        .content_type(ContentType::GeneratedImage)
        .relative_path("still.PNG")
        .build()
        .unwrap();
    let file = reader.read(&FileLocation::from_item(&item)).await.unwrap();
    assert_eq!(file.blob.bytes(), b"image");
    assert_eq!(file.blob.mime_type(), "image/png");
}

#[tokio::test]
async fn test_unknown_extension_uses_hint_then_default() {
    let fx = fixture().await;
    let config = ResolverConfig::builder()
        .default_mime_type("application/x-test")
        .build()
        .unwrap();
    let reader = LocalFileReader::new(fx.host.clone(), &config);

    let file = reader
        .read(&FileLocation::in_folder(&fx.token, "notes.bin"))
        .await
        .unwrap();
    assert_eq!(file.blob.mime_type(), "application/x-test");

    let file = reader
        .read(&FileLocation::in_folder(&fx.token, "notes.bin").with_mime_hint("video/webm"))
        .await
        .unwrap();
    assert_eq!(file.blob.mime_type(), "video/webm");
}

#[tokio::test]
async fn test_missing_segment_fails_with_original_path() {
    let fx = fixture().await;
    let reader = LocalFileReader::new(fx.host.clone(), &ResolverConfig::default());

    let err = reader
        .read(&FileLocation::in_folder(&fx.token, "gone/a.mp4"))
        .await
        .unwrap_err();
    assert_eq!(err.path, "gone/a.mp4");
    assert!(err.reason.contains("gone"));

    let err = reader
        .read(&FileLocation::in_folder("bad-token", "clips/a.mp4"))
        .await
        .unwrap_err();
    assert_eq!(err.path, "clips/a.mp4");

    let err = reader.read(&FileLocation::default()).await.unwrap_err();
    assert_eq!(err.path, "");
}

#[tokio::test]
async fn test_dotdot_is_rejected() {
    let fx = fixture().await;
    let reader = LocalFileReader::new(fx.host.clone(), &ResolverConfig::default());
    let result = reader
        .read(&FileLocation::in_folder(&fx.token, "../outside.png"))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_native_reader_wins_and_decodes_base64() {
    let fx = fixture().await;
    let reader = LocalFileReader::new(fx.host.clone(), &ResolverConfig::default())
        .with_native_reader(Arc::new(DirectPathReader::new().with_base64_transport(true)));
    assert!(reader.has_native_reader());

    let local = fx.dir.path().join("clips").join("a.mp4");
    let file = reader
        .read(&FileLocation::at_path(local.display().to_string()))
        .await
        .unwrap();
    assert_eq!(file.source, ReadSource::Native);
    assert_eq!(file.blob.bytes(), b"video");
    assert_eq!(file.blob.mime_type(), "video/mp4");
}

#[tokio::test]
async fn test_native_joins_base_path_with_relative() {
    let fx = fixture().await;
    let config = ResolverConfig::builder()
        .base_folder_token(fx.token.clone())
        .base_folder_path(fx.dir.path().display().to_string())
        .build()
        .unwrap();
    let reader = LocalFileReader::new(fx.host.clone(), &config)
        .with_native_reader(Arc::new(DirectPathReader::new()));

    let file = reader
        .read(&FileLocation::in_folder(&fx.token, "clips/a.mp4"))
        .await
        .unwrap();
    assert_eq!(file.source, ReadSource::Native);
}

#[tokio::test]
async fn test_native_failure_falls_back_to_walk() {
    let fx = fixture().await;
    let native = Arc::new(BrokenNative::default());
    let config = ResolverConfig::builder()
        .base_folder_token(fx.token.clone())
        .base_folder_path(fx.dir.path().display().to_string())
        .build()
        .unwrap();
    let reader =
        LocalFileReader::new(fx.host.clone(), &config).with_native_reader(native.clone());

    let file = reader
        .read(&FileLocation::in_folder(&fx.token, "clips/a.mp4"))
        .await
        .unwrap();
    assert_eq!(file.source, ReadSource::FolderWalk);
    assert_eq!(native.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_native_skips_items_from_other_grants() {
    let fx = fixture().await;
    std::fs::write(fx.dir.path().join("a.png"), b"BASE FOLDER").unwrap();
    let other = TempDir::new().unwrap();
    std::fs::write(other.path().join("a.png"), b"OTHER FOLDER").unwrap();
    let other_token = fx.host.grant(other.path()).await.unwrap();

    let native = Arc::new(BrokenNative::default());
    let config = ResolverConfig::builder()
        .base_folder_token(fx.token.clone())
        .base_folder_path(fx.dir.path().display().to_string())
        .build()
        .unwrap();
    let reader = LocalFileReader::new(fx.host.clone(), &config)
        .with_native_reader(Arc::new(DirectPathReader::new()));

    let file = reader
        .read(&FileLocation::in_folder(&other_token, "a.png"))
        .await
        .unwrap();
    assert_eq!(file.source, ReadSource::FolderWalk);
    assert_eq!(file.blob.bytes(), b"OTHER FOLDER");

    let file = reader
        .read(&FileLocation::in_folder(&fx.token, "a.png"))
        .await
        .unwrap();
    assert_eq!(file.source, ReadSource::Native);
    assert_eq!(file.blob.bytes(), b"BASE FOLDER");

    // A token with no configured base token never reaches the native reader.
    let config = ResolverConfig::builder()
        .base_folder_path(fx.dir.path().display().to_string())
        .build()
        .unwrap();
    let reader = LocalFileReader::new(fx.host.clone(), &config).with_native_reader(native.clone());
    let file = reader
        .read(&FileLocation::in_folder(&other_token, "a.png"))
        .await
        .unwrap();
    assert_eq!(file.blob.bytes(), b"OTHER FOLDER");
    assert_eq!(native.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_view_results_are_normalized() {
    let fx = fixture().await;
    let host = Arc::new(ViewOnlyHost {
        root: fx.dir.path().to_path_buf(),
    });
    let reader = LocalFileReader::new(host, &ResolverConfig::default());

    let file = reader
        .read(&FileLocation::in_folder("view", "clips/a.mp4"))
        .await
        .unwrap();
    assert_eq!(file.blob.bytes(), b"video");
}

#[test]
fn test_mime_table_coverage() {
    for (path, mime) in [
        ("a.png", "image/png"),
        ("a.jpg", "image/jpeg"),
        ("a.webp", "image/webp"),
        ("a.gif", "image/gif"),
        ("a.bmp", "image/bmp"),
        ("a.tiff", "image/tiff"),
        ("a.heic", "image/heic"),
        ("a.psd", "image/vnd.adobe.photoshop"),
        ("a.svg", "image/svg+xml"),
        ("a.webm", "video/webm"),
        ("a.avi", "video/x-msvideo"),
        ("a.mov", "video/quicktime"),
        ("a.mkv", "video/x-matroska"),
        ("a.m4v", "video/x-m4v"),
        ("README", "image/jpeg"),
        (".png", "image/jpeg"),
    ] {
        assert_eq!(mime_for_path(path, "image/jpeg"), mime, "{}", path);
    }
}
