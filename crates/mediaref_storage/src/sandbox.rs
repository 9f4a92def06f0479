//! Token-granted folder host backed by the local filesystem.
//!
//! Folders are reachable only through persistent tokens issued by
//! [`SandboxedFolderHost::grant`] or registered from configuration. Lookups
//! walk one child at a time and never leave the granted folder.

use crate::{BinaryResult, Entry, EntryKind, FolderHost, ReadFormat};
use mediaref_error::{MediarefResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Filesystem folder host with persistent-token grants.
///
/// # Example Structure
///
/// ```text
/// token "tok1" ──► /Users/me/Documents/Generations/
///                  ├── 2024-05-01/
///                  │   ├── firefly-1.png
///                  │   └── firefly-1.png.json
///                  └── clips/
///                      └── a.mp4
/// ```
///
/// # Features
///
/// - **Persistent tokens**: Opaque strings that resolve to a granted folder
/// - **Segment walking**: Children are looked up one name at a time
/// - **Read shapes**: Binary reads return a raw buffer; default reads return
///   a typed-array view, the way hosts without a binary format option do
pub struct SandboxedFolderHost {
    grants: RwLock<HashMap<String, PathBuf>>,
    binary_format: bool,
}

impl SandboxedFolderHost {
    /// Create a host with no grants that honors binary reads.
    pub fn new() -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
            binary_format: true,
        }
    }

    /// Whether the host honors [`ReadFormat::Binary`].
    pub fn with_binary_format(mut self, enabled: bool) -> Self {
        self.binary_format = enabled;
        self
    }

    /// Grant access to `path` and return a new persistent token for it.
    ///
    /// # Errors
    ///
    /// Returns error if the path does not exist or is not a folder.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn grant(&self, path: impl AsRef<Path>) -> MediarefResult<String> {
        let token = Uuid::new_v4().to_string();
        self.register(token.clone(), path).await?;
        Ok(token)
    }

    /// Register an existing token for `path`, replacing any previous grant.
    ///
    /// # Errors
    ///
    /// Returns error if the path does not exist or is not a folder.
    #[tracing::instrument(skip(self, token, path), fields(path = %path.as_ref().display()))]
    pub async fn register(
        &self,
        token: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> MediarefResult<()> {
        let path = path.as_ref();
        let canonical = tokio::fs::canonicalize(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::NotFound(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let metadata = tokio::fs::metadata(&canonical).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                canonical.display(),
                e
            )))
        })?;
        if !metadata.is_dir() {
            return Err(StorageError::new(StorageErrorKind::NotAFolder(
                canonical.display().to_string(),
            ))
            .into());
        }

        let token = token.into();
        tracing::info!(path = %canonical.display(), "Registered folder grant");
        self.grants.write().await.insert(token, canonical);
        Ok(())
    }

    /// Drop a grant. Returns whether the token was known.
    pub async fn revoke(&self, token: &str) -> bool {
        self.grants.write().await.remove(token).is_some()
    }

    /// Number of active grants.
    pub async fn grant_count(&self) -> usize {
        self.grants.read().await.len()
    }
}

impl Default for SandboxedFolderHost {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl FolderHost for SandboxedFolderHost {
    #[tracing::instrument(skip(self, token))]
    async fn folder_for_token(&self, token: &str) -> MediarefResult<Entry> {
        let path = self
            .grants
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::InvalidToken(token.to_string())))?;

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::new(StorageErrorKind::NotFound(
                path.display().to_string(),
            ))
            .into());
        }

        tracing::debug!(path = %path.display(), "Resolved folder token");
        Ok(Entry {
            name: entry_name(&path),
            kind: EntryKind::Folder,
            native_path: path,
        })
    }

    #[tracing::instrument(skip(self, folder), fields(folder = %folder.native_path.display()))]
    async fn child(&self, folder: &Entry, name: &str) -> MediarefResult<Entry> {
        if !folder.is_folder() {
            return Err(StorageError::new(StorageErrorKind::NotAFolder(
                folder.native_path.display().to_string(),
            ))
            .into());
        }
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(name.to_string())).into());
        }

        let path = folder.native_path.join(name);
        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let kind = if metadata.is_dir() {
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

    #[tracing::instrument(skip(self, file, format), fields(path = %file.native_path.display(), %format))]
    async fn read(&self, file: &Entry, format: ReadFormat) -> MediarefResult<BinaryResult> {
        if file.is_folder() {
            return Err(StorageError::new(StorageErrorKind::NotAFile(
                file.native_path.display().to_string(),
            ))
            .into());
        }

        let data = tokio::fs::read(&file.native_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(
                    file.native_path.display().to_string(),
                ))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    file.native_path.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(size = data.len(), "Read file");

        match format {
            ReadFormat::Binary if self.binary_format => Ok(BinaryResult::RawBuffer(data)),
            _ => Ok(BinaryResult::view(data)),
        }
    }

    fn supports_binary_format(&self) -> bool {
        self.binary_format
    }
}
