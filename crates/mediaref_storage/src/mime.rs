//! Extension to MIME type lookup.

/// Default used when neither the extension nor the caller names a type.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const MIME_TABLE: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
    ("psd", "image/vnd.adobe.photoshop"),
    ("svg", "image/svg+xml"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("m4v", "video/x-m4v"),
];

/// MIME type for a known extension (case-insensitive, without the dot).
///
/// # Examples
///
/// ```
/// use mediaref_storage::mime_for_extension;
///
/// assert_eq!(mime_for_extension("PNG"), Some("image/png"));
/// assert_eq!(mime_for_extension("mov"), Some("video/quicktime"));
/// assert_eq!(mime_for_extension("txt"), None);
/// ```
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    MIME_TABLE
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| *mime)
}

/// Infer a MIME type from the extension of `path`, falling back to `default`.
///
/// Both `/` and `\` are treated as separators.
///
/// # Examples
///
/// ```
/// use mediaref_storage::{DEFAULT_MIME_TYPE, mime_for_path};
///
/// assert_eq!(mime_for_path("clips/a.mp4", DEFAULT_MIME_TYPE), "video/mp4");
/// assert_eq!(mime_for_path("C:\\out\\b.JPEG", DEFAULT_MIME_TYPE), "image/jpeg");
/// assert_eq!(mime_for_path("notes.bin", "application/octet-stream"), "application/octet-stream");
/// ```
pub fn mime_for_path<'a>(path: &str, default: &'a str) -> &'a str {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let known = file_name
        .rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty())
        .and_then(|(_, ext)| mime_for_extension(ext));
    match known {
        Some(mime) => mime,
        None => default,
    }
}
