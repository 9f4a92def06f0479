//! Host filesystem contract.

use crate::BinaryResult;
use mediaref_error::MediarefResult;
use std::path::PathBuf;

/// Whether an entry is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EntryKind {
    /// Regular file
    #[display("file")]
    File,
    /// Folder
    #[display("folder")]
    Folder,
}

/// Handle to a file or folder inside a granted location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Entry name (last path segment)
    pub name: String,
    /// File or folder
    pub kind: EntryKind,
    /// Native filesystem path
    pub native_path: PathBuf,
}

impl Entry {
    /// Whether this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Format requested from [`FolderHost::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReadFormat {
    /// Explicit binary read
    #[display("binary")]
    Binary,
    /// Whatever the host returns by default
    #[display("default")]
    Default,
}

/// Host filesystem operations the local file reader depends on.
///
/// Errors are opaque to callers: a failed lookup means "not found", a failed
/// read means "read failed".
#[async_trait::async_trait]
pub trait FolderHost: Send + Sync {
    /// Resolve a persistent token to the folder it grants.
    async fn folder_for_token(&self, token: &str) -> MediarefResult<Entry>;

    /// Look up a direct child of `folder` by name.
    async fn child(&self, folder: &Entry, name: &str) -> MediarefResult<Entry>;

    /// Read a file's contents.
    async fn read(&self, file: &Entry, format: ReadFormat) -> MediarefResult<BinaryResult>;

    /// Whether [`ReadFormat::Binary`] is honored.
    fn supports_binary_format(&self) -> bool {
        true
    }
}
