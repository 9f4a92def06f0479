//! Top-level error wrapper types.

use crate::{
    ConfigError, EncodingError, FileUnavailableError, HttpError, JsonError,
    ReferenceUnresolvedError, StorageError,
};

/// Every error the mediaref crates can produce.
///
/// # Examples
///
/// ```
/// use mediaref_error::{MediarefError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: MediarefError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MediarefErrorKind {
    /// Malformed base64 or data URL
    #[from(EncodingError)]
    Encoding(EncodingError),
    /// Local file not readable by any strategy
    #[from(FileUnavailableError)]
    FileUnavailable(FileUnavailableError),
    /// All resolution strategies exhausted
    #[from(ReferenceUnresolvedError)]
    ReferenceUnresolved(ReferenceUnresolvedError),
    /// Host filesystem error
    #[from(StorageError)]
    Storage(StorageError),
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON error
    #[from(JsonError)]
    Json(JsonError),
}

/// Mediaref error with kind discrimination.
///
/// # Examples
///
/// ```
/// use mediaref_error::{MediarefErrorKind, MediarefResult, ConfigError};
///
/// fn might_fail() -> MediarefResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), MediarefErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Mediaref Error: {}", _0)]
pub struct MediarefError(Box<MediarefErrorKind>);

impl MediarefError {
    /// Create a new error from a kind.
    pub fn new(kind: MediarefErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MediarefErrorKind {
        &self.0
    }

    /// Consume the wrapper and return the kind.
    pub fn into_kind(self) -> MediarefErrorKind {
        *self.0
    }
}

// Generic From implementation for any type that converts to MediarefErrorKind
impl<T> From<T> for MediarefError
where
    T: Into<MediarefErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for mediaref operations.
pub type MediarefResult<T> = std::result::Result<T, MediarefError>;
