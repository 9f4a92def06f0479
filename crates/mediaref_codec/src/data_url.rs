//! `data:` URL encoding and parsing.

use crate::{decode_base64, encode_base64};
use mediaref_core::Blob;
use mediaref_error::{EncodingError, EncodingErrorKind};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A parsed data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type from the header
    pub mime_type: String,
    /// Decoded payload
    pub bytes: Vec<u8>,
    /// Whether the payload was base64 encoded
    pub base64: bool,
}

impl DataUrl {
    /// Convert into a MIME-tagged blob.
    pub fn into_blob(self) -> Blob {
        Blob::new(self.bytes, self.mime_type)
    }
}

/// Build `data:<mime>;base64,<payload>` for `bytes`.
///
/// # Examples
///
/// ```
/// use mediaref_codec::encode_data_url;
///
/// assert_eq!(encode_data_url(b"hi", "text/plain"), "data:text/plain;base64,aGk=");
/// ```
pub fn encode_data_url(bytes: &[u8], mime_type: &str) -> String {
    let mime_type = if mime_type.trim().is_empty() {
        DEFAULT_MIME_TYPE
    } else {
        mime_type
    };
    format!("data:{};base64,{}", mime_type, encode_base64(bytes))
}

/// Build a data URL carrying a blob's bytes and MIME type.
pub fn encode_blob_data_url(blob: &Blob) -> String {
    encode_data_url(blob.bytes(), blob.mime_type())
}

/// Parse a data URL into its MIME type and payload.
///
/// Payloads without a `;base64` marker are returned as their raw bytes.
///
/// # Errors
///
/// Returns [`EncodingErrorKind::MalformedDataUrl`] if the input is not a data
/// URL or has no payload separator, and any base64 error from the payload.
///
/// # Examples
///
/// ```
/// use mediaref_codec::parse_data_url;
///
/// let parsed = parse_data_url("data:video/mp4;base64,AAEC").unwrap();
/// assert_eq!(parsed.mime_type, "video/mp4");
/// assert_eq!(parsed.bytes, vec![0, 1, 2]);
/// ```
pub fn parse_data_url(url: &str) -> Result<DataUrl, EncodingError> {
    let malformed = |reason: &str| {
        EncodingError::new(EncodingErrorKind::MalformedDataUrl(format!(
            "{}: {}",
            reason,
            preview(url)
        )))
    };

    let rest = url
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &url[5..])
        .ok_or_else(|| malformed("missing data: scheme"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| malformed("missing payload separator"))?;

    let mut parts = header.split(';');
    let mime_type = parts
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();
    let base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if base64 {
        decode_base64(payload)?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUrl {
        mime_type,
        bytes,
        base64,
    })
}

/// Shorten a URL for diagnostics; data URLs can be megabytes long.
fn preview(url: &str) -> &str {
    match url.char_indices().nth(48) {
        Some((end, _)) => &url[..end],
        None => url,
    }
}
