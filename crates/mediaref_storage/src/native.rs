//! Direct-path file reading, used as the fast path when available.

use mediaref_codec::encode_base64;
use mediaref_error::{MediarefResult, StorageError, StorageErrorKind};
use std::path::Path;

/// Payload shapes a native reader can hand back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeRead {
    /// File contents transported as base64 text
    Base64(String),
    /// File contents as raw bytes
    Bytes(Vec<u8>),
}

/// Native add-on capability that reads a file by absolute path.
#[async_trait::async_trait]
pub trait NativeFileReader: Send + Sync {
    /// Read the file at `path`.
    async fn read_file(&self, path: &Path) -> MediarefResult<NativeRead>;
}

/// Native reader over the process's own filesystem access.
///
/// With base64 transport enabled the payload is handed back as text, the way
/// add-ons that only expose string channels return binary files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPathReader {
    base64_transport: bool,
}

impl DirectPathReader {
    /// Reader returning raw bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return payloads as base64 text instead of bytes.
    pub fn with_base64_transport(mut self, enabled: bool) -> Self {
        self.base64_transport = enabled;
        self
    }
}

#[async_trait::async_trait]
impl NativeFileReader for DirectPathReader {
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    async fn read_file(&self, path: &Path) -> MediarefResult<NativeRead> {
        let data = tokio::fs::read(path).await.map_err(|e| {
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

        tracing::debug!(size = data.len(), "Native read");

        if self.base64_transport {
            Ok(NativeRead::Base64(encode_base64(&data)))
        } else {
            Ok(NativeRead::Bytes(data))
        }
    }
}
