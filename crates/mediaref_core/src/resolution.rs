//! Outcome of resolving a content item.

use crate::PersistenceMethod;
use serde::{Deserialize, Serialize};

/// Step of the fallback chain that produced a resolution.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::AsRefStr,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// The item's primary ephemeral reference was still live
    #[display("primary")]
    Primary,
    /// Bytes were read from the local folder and minted as an object URL
    #[display("local-file")]
    LocalFile,
    /// The backup object URL was still live
    #[display("backup-blob")]
    BackupBlob,
    /// A remote URL answered the existence probe
    #[display("remote")]
    Remote,
    /// A stale object URL was re-encoded as a data URL
    #[display("converted")]
    Converted,
}

/// A renderable reference for one content item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Renderable URL
    pub url: String,
    /// Mechanism backing `url`
    pub persistence_method: PersistenceMethod,
    /// Step that produced the URL
    pub strategy: Strategy,
    /// Whether `url` was minted by the resolver and must be revoked on teardown
    pub minted: bool,
}

impl Resolution {
    /// Resolution that reuses an existing reference.
    pub fn existing(
        url: impl Into<String>,
        persistence_method: PersistenceMethod,
        strategy: Strategy,
    ) -> Self {
        Self {
            url: url.into(),
            persistence_method,
            strategy,
            minted: false,
        }
    }

    /// Resolution backed by an object URL the resolver just minted.
    pub fn minted(url: impl Into<String>, persistence_method: PersistenceMethod) -> Self {
        Self {
            url: url.into(),
            persistence_method,
            strategy: Strategy::LocalFile,
            minted: true,
        }
    }
}
