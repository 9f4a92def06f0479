//! Write-back patches produced by the resolver.

use crate::{ItemStatus, PersistenceMethod};
use serde::{Deserialize, Serialize};

/// What to do with an item's thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThumbnailUpdate {
    /// Leave the thumbnail as it is
    #[default]
    Keep,
    /// Replace the thumbnail
    Set(String),
    /// Remove a dead thumbnail so the view falls back to its poster
    Clear,
}

/// Fields the resolver writes back onto a content item.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPatch {
    /// New display URL
    pub display_url: Option<String>,
    /// New video URL for video payloads
    pub video_url: Option<String>,
    /// Thumbnail change
    pub thumbnail_url: ThumbnailUpdate,
    /// Mechanism backing the new reference
    pub persistence_method: Option<PersistenceMethod>,
    /// New status
    pub status: Option<ItemStatus>,
    /// Message accompanying `status`
    pub error_message: Option<String>,
}

impl ContentPatch {
    /// Patch that marks an item as unrenderable.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(ItemStatus::Error),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
