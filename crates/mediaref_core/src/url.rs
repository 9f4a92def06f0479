//! URL shape classification.

use serde::{Deserialize, Serialize};

/// Broad shape of a media reference string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum UrlKind {
    /// `blob:` object URL, valid until revoked
    #[display("blob")]
    Blob,
    /// `data:` URL, self-contained
    #[display("data")]
    Data,
    /// `http:`/`https:` URL
    #[display("remote")]
    Remote,
    /// Anything else (raw paths, `file:` URLs, unknown schemes)
    #[display("other")]
    Other,
}

impl UrlKind {
    /// Classify a reference by its scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediaref_core::UrlKind;
    ///
    /// assert_eq!(UrlKind::classify("blob:mediaref/1234"), UrlKind::Blob);
    /// assert_eq!(UrlKind::classify("data:image/png;base64,AAAA"), UrlKind::Data);
    /// assert_eq!(UrlKind::classify("https://storage.example/img.png"), UrlKind::Remote);
    /// assert_eq!(UrlKind::classify("/Users/me/a.png"), UrlKind::Other);
    /// ```
    pub fn classify(url: &str) -> Self {
        let url = url.trim_start();
        if has_scheme(url, "blob:") {
            UrlKind::Blob
        } else if has_scheme(url, "data:") {
            UrlKind::Data
        } else if has_scheme(url, "https://") || has_scheme(url, "http://") {
            UrlKind::Remote
        } else {
            UrlKind::Other
        }
    }

    /// Whether references of this kind live only as long as their document context.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, UrlKind::Blob | UrlKind::Data)
    }
}

fn has_scheme(url: &str, scheme: &str) -> bool {
    url.get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

/// Whether a `blob:` URL carries an origin before its id.
///
/// Some hosts mint object URLs such as `blob:/blob-1` with no origin; those
/// cannot be fetched back reliably and are treated as malformed.
///
/// # Examples
///
/// ```
/// use mediaref_core::is_well_formed_object_url;
///
/// assert!(is_well_formed_object_url("blob:mediaref/6f1c"));
/// assert!(!is_well_formed_object_url("blob:/blob-1"));
/// assert!(!is_well_formed_object_url("https://example.com/a.png"));
/// ```
pub fn is_well_formed_object_url(url: &str) -> bool {
    if UrlKind::classify(url) != UrlKind::Blob {
        return false;
    }
    let rest = &url.trim_start()["blob:".len()..];
    match rest.split_once('/') {
        Some((origin, id)) => !origin.is_empty() && !id.is_empty(),
        None => false,
    }
}
