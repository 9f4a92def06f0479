//! Base64 and data URL encoding errors.

/// Kinds of encoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum EncodingErrorKind {
    /// Input length is not a multiple of four
    #[display("Invalid base64 length: {}", _0)]
    InvalidLength(usize),
    /// Input contains a byte outside the standard alphabet
    #[display("Invalid base64 character {:?} at offset {}", character, offset)]
    InvalidCharacter {
        /// The offending character
        character: char,
        /// Byte offset in the input
        offset: usize,
    },
    /// Padding appears somewhere other than the final one or two positions
    #[display("Invalid base64 padding at offset {}", _0)]
    InvalidPadding(usize),
    /// A data URL could not be split into header and payload
    #[display("Malformed data URL: {}", _0)]
    MalformedDataUrl(String),
}

/// Encoding error with location tracking.
///
/// Encoding failures are not retryable: the same input always fails the same way.
///
/// # Examples
///
/// ```
/// use mediaref_error::{EncodingError, EncodingErrorKind};
///
/// let err = EncodingError::new(EncodingErrorKind::InvalidLength(5));
/// assert!(format!("{}", err).contains("length"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Encoding Error: {} at line {} in {}", kind, line, file)]
pub struct EncodingError {
    /// The kind of error that occurred
    pub kind: EncodingErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl EncodingError {
    /// Create a new encoding error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: EncodingErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EncodingErrorKind {
        &self.kind
    }
}
