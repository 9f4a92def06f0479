//! Local file reading with a native fast path and a token-walk fallback.

use crate::{
    BinaryResult, FolderHost, NativeFileReader, NativeRead, ReadFormat, mime_for_path,
    path_segments, strip_base_prefix,
};
use mediaref_codec::decode_base64;
use mediaref_core::{Blob, ContentItem, ResolverConfig};
use mediaref_error::FileUnavailableError;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a file lives, as recorded on a content item.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct FileLocation {
    folder_token: Option<String>,
    relative_path: Option<String>,
    local_path: Option<String>,
    mime_hint: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl FileLocation {
    /// Location from an item's folder coordinates and local path.
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            folder_token: non_blank(item.folder_token.as_ref()),
            relative_path: non_blank(item.relative_path.as_ref()),
            local_path: non_blank(item.local_path.as_ref()),
            mime_hint: Some(item.effective_mime_type().to_string()),
        }
    }

    /// A file inside the folder granted by `token`.
    pub fn in_folder(token: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            folder_token: Some(token.into()),
            relative_path: Some(relative_path.into()),
            ..Self::default()
        }
    }

    /// A file addressed by native path only.
    pub fn at_path(local_path: impl Into<String>) -> Self {
        Self {
            local_path: Some(local_path.into()),
            ..Self::default()
        }
    }

    /// MIME type to use when the extension is unknown.
    pub fn with_mime_hint(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_hint = Some(mime_type.into());
        self
    }

    /// Whether any coordinate is present.
    pub fn is_empty(&self) -> bool {
        self.relative_path.is_none() && self.local_path.is_none()
    }

    /// Path as the caller supplied it, for diagnostics.
    pub fn display_path(&self) -> &str {
        self.relative_path
            .as_deref()
            .or(self.local_path.as_deref())
            .unwrap_or("")
    }
}

/// Which strategy produced a file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReadSource {
    /// Native direct-path reader
    #[display("native")]
    Native,
    /// Token-resolved folder walk
    #[display("folder-walk")]
    FolderWalk,
}

/// Bytes read from local storage.
#[derive(Debug, Clone)]
pub struct LocalFile {
    /// File contents tagged with the inferred MIME type
    pub blob: Blob,
    /// Strategy that succeeded
    pub source: ReadSource,
    /// Path the bytes were read from
    pub path: String,
}

/// Reads local files through the strongest available strategy.
///
/// Strategies are tried in order:
///
/// 1. The native reader, if one was supplied, against the item's local path
///    or the base folder path joined with the relative path
/// 2. A walk from the token-granted folder, one segment at a time
///
/// Failures of individual strategies are logged; only total exhaustion
/// surfaces as [`FileUnavailableError`].
pub struct LocalFileReader {
    host: Arc<dyn FolderHost>,
    native: Option<Arc<dyn NativeFileReader>>,
    base_folder_token: Option<String>,
    base_folder_path: Option<String>,
    default_mime_type: String,
}

impl LocalFileReader {
    /// Reader over `host` using the base folder settings from `config`.
    pub fn new(host: Arc<dyn FolderHost>, config: &ResolverConfig) -> Self {
        Self {
            host,
            native: None,
            base_folder_token: config.base_folder_token().clone(),
            base_folder_path: config.base_folder_path().clone(),
            default_mime_type: config.default_mime_type().clone(),
        }
    }

    /// Offer a native reader as the fast path.
    pub fn with_native_reader(mut self, native: Arc<dyn NativeFileReader>) -> Self {
        self.native = Some(native);
        self
    }

    /// Whether a native reader is present.
    pub fn has_native_reader(&self) -> bool {
        self.native.is_some()
    }

    /// Read the file at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`FileUnavailableError`] carrying the supplied path when no
    /// strategy could produce the bytes.
    #[tracing::instrument(skip(self, location), fields(path = location.display_path()))]
    pub async fn read(&self, location: &FileLocation) -> Result<LocalFile, FileUnavailableError> {
        let mut reason = String::from("no local coordinates");

        if let Some(native) = &self.native {
            match self.native_path(location) {
                Some(path) => match self.read_native(native.as_ref(), &path).await {
                    Ok(bytes) => {
                        let path = path.display().to_string();
                        return Ok(self.finish(bytes, ReadSource::Native, path, location));
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Native read failed");
                        reason = e;
                    }
                },
                None => tracing::debug!("No native path for location"),
            }
        }

        let token = location
            .folder_token
            .as_deref()
            .or(self.base_folder_token.as_deref());
        match (token, location.relative_path.as_deref()) {
            (Some(token), Some(relative)) => match self.walk(token, relative).await {
                Ok(bytes) => {
                    return Ok(self.finish(
                        bytes,
                        ReadSource::FolderWalk,
                        relative.to_string(),
                        location,
                    ));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Folder walk failed");
                    reason = e;
                }
            },
            _ => tracing::debug!("No folder token for location"),
        }

        tracing::warn!(%reason, "Local file unavailable");
        Err(FileUnavailableError::new(location.display_path(), reason))
    }

    fn native_path(&self, location: &FileLocation) -> Option<PathBuf> {
        if let Some(local) = &location.local_path {
            return Some(PathBuf::from(local));
        }
        // Only the base folder's own token maps onto the base path.
        if let Some(token) = location.folder_token.as_deref()
            && self.base_folder_token.as_deref() != Some(token)
        {
            return None;
        }
        let base = self.base_folder_path.as_deref()?;
        let relative = location.relative_path.as_deref()?;
        let stripped = strip_base_prefix(relative, Some(base));
        let segments = path_segments(&stripped).ok()?;
        let mut path = PathBuf::from(base);
        path.extend(segments);
        Some(path)
    }

    async fn read_native(
        &self,
        native: &dyn NativeFileReader,
        path: &std::path::Path,
    ) -> Result<Vec<u8>, String> {
        match native.read_file(path).await.map_err(|e| e.to_string())? {
            NativeRead::Bytes(bytes) => Ok(bytes),
            NativeRead::Base64(text) => decode_base64(&text).map_err(|e| e.to_string()),
        }
    }

    async fn walk(&self, token: &str, relative: &str) -> Result<Vec<u8>, String> {
        let stripped = strip_base_prefix(relative, self.base_folder_path.as_deref());
        let segments = path_segments(&stripped).map_err(|e| e.to_string())?;

        let mut entry = self
            .host
            .folder_for_token(token)
            .await
            .map_err(|e| e.to_string())?;
        for segment in &segments {
            entry = self
                .host
                .child(&entry, segment)
                .await
                .map_err(|_| format!("segment '{}' not found", segment))?;
        }

        let format = if self.host.supports_binary_format() {
            ReadFormat::Binary
        } else {
            ReadFormat::Default
        };
        let result: BinaryResult = self
            .host
            .read(&entry, format)
            .await
            .map_err(|e| e.to_string())?;
        result.into_bytes().map_err(|e| e.to_string())
    }

    fn finish(
        &self,
        bytes: Vec<u8>,
        source: ReadSource,
        path: String,
        location: &FileLocation,
    ) -> LocalFile {
        let fallback = location
            .mime_hint
            .as_deref()
            .unwrap_or(self.default_mime_type.as_str());
        let mime_type = mime_for_path(&path, fallback).to_string();
        tracing::debug!(%source, size = bytes.len(), %mime_type, "Read local file");
        LocalFile {
            blob: Blob::new(bytes, mime_type),
            source,
            path,
        }
    }
}
