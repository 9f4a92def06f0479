//! Reference resolution errors.

/// Every fallback strategy for a content item was exhausted.
///
/// Terminal for that item's resolution; the view renders a placeholder.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Reference Unresolved: item {} after [{}] at line {} in {}",
    item_id,
    attempts.join(", "),
    line,
    file
)]
pub struct ReferenceUnresolvedError {
    /// Id of the content item
    pub item_id: String,
    /// Strategies that were attempted, in order
    pub attempts: Vec<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ReferenceUnresolvedError {
    /// Create a new error for `item_id` listing the attempted strategies.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediaref_error::ReferenceUnresolvedError;
    ///
    /// let err = ReferenceUnresolvedError::new("img-1", vec!["local".to_string()]);
    /// assert!(format!("{}", err).contains("img-1"));
    /// ```
    #[track_caller]
    pub fn new(item_id: impl Into<String>, attempts: Vec<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            item_id: item_id.into(),
            attempts,
            line: location.line(),
            file: location.file(),
        }
    }
}
