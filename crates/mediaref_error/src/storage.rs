//! Host filesystem error types.

/// Kinds of storage errors raised by a folder host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// No entry with the given name exists
    #[display("Entry not found: {}", _0)]
    NotFound(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Persistent token does not resolve to a granted folder
    #[display("Invalid folder token: {}", _0)]
    InvalidToken(String),
    /// Entry exists but is not a folder
    #[display("Not a folder: {}", _0)]
    NotAFolder(String),
    /// Entry exists but is not a file
    #[display("Not a file: {}", _0)]
    NotAFile(String),
    /// Path escapes its folder or is otherwise unusable
    #[display("Invalid storage path: {}", _0)]
    InvalidPath(String),
    /// Storage capability is not present in this environment
    #[display("Storage unavailable: {}", _0)]
    Unavailable(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use mediaref_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("clips".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorageErrorKind {
        &self.kind
    }

    /// Whether the host reported a missing entry rather than a read failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            StorageErrorKind::NotFound(_) | StorageErrorKind::InvalidToken(_)
        )
    }
}
