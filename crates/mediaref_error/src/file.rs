//! Local file availability errors.

/// A local file could not be read by any strategy.
///
/// Carries the path the caller asked for so diagnostics point at the
/// original request, not at an intermediate segment.
///
/// # Examples
///
/// ```
/// use mediaref_error::FileUnavailableError;
///
/// let err = FileUnavailableError::new("clips/a.mp4", "segment 'clips' not found");
/// assert_eq!(err.path, "clips/a.mp4");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("File Unavailable: {} ({}) at line {} in {}", path, reason, line, file)]
pub struct FileUnavailableError {
    /// Path as supplied by the caller
    pub path: String,
    /// Why the last strategy failed
    pub reason: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl FileUnavailableError {
    /// Create a new FileUnavailableError at the current location.
    #[track_caller]
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            path: path.into(),
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
