//! Relative path normalization.

use mediaref_error::{StorageError, StorageErrorKind};

fn normalize(path: &str) -> String {
    path.trim().replace('\\', "/")
}

/// Remove `base` from the front of `path` when `path` still carries it.
///
/// Matching is on whole segments: `/out/gen` strips from `/out/gen/a.png`
/// but not from `/out/generations/a.png`.
pub fn strip_base_prefix(path: &str, base: Option<&str>) -> String {
    let path = normalize(path);
    let Some(base) = base.map(normalize) else {
        return path;
    };
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path;
    }
    match path.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.to_string(),
        _ => path,
    }
}

/// Split a relative path into the segments to walk.
///
/// Empty and `.` segments are dropped.
///
/// # Errors
///
/// Returns an `InvalidPath` error for `..` segments or when nothing remains.
///
/// # Examples
///
/// ```
/// use mediaref_storage::path_segments;
///
/// assert_eq!(path_segments("clips\\./a.mp4").unwrap(), vec!["clips", "a.mp4"]);
/// assert!(path_segments("../secret.png").is_err());
/// ```
pub fn path_segments(path: &str) -> Result<Vec<String>, StorageError> {
    let normalized = normalize(path);
    let mut segments = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(StorageError::new(StorageErrorKind::InvalidPath(
                    path.to_string(),
                )));
            }
            other => segments.push(other.to_string()),
        }
    }
    if segments.is_empty() {
        return Err(StorageError::new(StorageErrorKind::InvalidPath(
            path.to_string(),
        )));
    }
    Ok(segments)
}
