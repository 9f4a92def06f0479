//! In-memory binary payloads tagged with a MIME type.

use std::sync::Arc;

/// Immutable bytes plus the MIME type they were tagged with.
///
/// Cloning is cheap; the payload is shared.
///
/// # Examples
///
/// ```
/// use mediaref_core::Blob;
///
/// let blob = Blob::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png");
/// assert_eq!(blob.len(), 4);
/// assert_eq!(blob.mime_type(), "image/png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl Blob {
    /// Wrap `bytes` with the given MIME type.
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Raw payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type the payload was tagged with.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
