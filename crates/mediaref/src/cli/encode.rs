//! Encode and MIME command handlers.

use mediaref::{
    MediarefConfig, MediarefResult, StorageError, StorageErrorKind, encode_data_url, mime_for_path,
};
use std::path::Path;

/// Print `file` as a data URL.
pub async fn encode_file(
    config: &MediarefConfig,
    file: &Path,
    mime: Option<&str>,
) -> MediarefResult<()> {
    let bytes = tokio::fs::read(file).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            file.display(),
            e
        )))
    })?;

    let name = file.to_string_lossy();
    let mime = match mime {
        Some(mime) => mime,
        None => mime_for_path(&name, config.resolver().default_mime_type()),
    };
    tracing::debug!(size = bytes.len(), mime, "Encoding file");
    println!("{}", encode_data_url(&bytes, mime));
    Ok(())
}

/// Print the MIME type inferred from `path`.
pub fn print_mime(config: &MediarefConfig, path: &str) {
    println!(
        "{}",
        mime_for_path(path, config.resolver().default_mime_type())
    );
}
