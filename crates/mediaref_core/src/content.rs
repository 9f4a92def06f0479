//! The unified content item model.

use crate::{ContentPatch, ThumbnailUpdate, UrlKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of media a content item holds.
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
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    /// Image produced by a generation service
    #[display("generated-image")]
    GeneratedImage,
    /// Image produced by a correction pass over another item
    #[display("corrected-image")]
    CorrectedImage,
    /// Image supplied by the user
    #[display("uploaded-image")]
    UploadedImage,
    /// Generated video
    #[display("video")]
    Video,
    /// Video supplied by the user
    #[display("uploaded-video")]
    UploadedVideo,
}

impl ContentType {
    /// Whether items of this type hold video.
    pub fn is_video(&self) -> bool {
        matches!(self, ContentType::Video | ContentType::UploadedVideo)
    }

    /// MIME type assumed when neither the item nor its path says otherwise.
    pub fn fallback_mime_type(&self) -> &'static str {
        if self.is_video() { "video/mp4" } else { "image/jpeg" }
    }
}

/// Where the item's bytes were originally persisted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Cloud blob storage
    #[display("azure")]
    Azure,
    /// User-granted local folder
    #[display("local")]
    Local,
    /// Only in memory for this session
    #[default]
    #[display("memory")]
    Memory,
}

/// Mechanism backing the currently active display reference.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum PersistenceMethod {
    /// Object URL
    #[default]
    #[display("blob")]
    Blob,
    /// Self-contained base64 data URL
    #[display("dataUrl")]
    DataUrl,
    /// Directly fetchable remote URL
    #[display("presigned")]
    Presigned,
    /// Bytes read from the local folder
    #[display("local")]
    Local,
}

/// Lifecycle status of an item.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Still being generated or uploaded
    #[display("processing")]
    Processing,
    /// Renderable
    #[default]
    #[display("ready")]
    Ready,
    /// No reference could be resolved
    #[display("error")]
    Error,
    /// A remote reference has passed its expiry
    #[display("expired")]
    Expired,
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Payload-specific fields, discriminated by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentData {
    /// A generated image
    #[serde(rename_all = "camelCase")]
    GeneratedImage {
        /// URL returned by the generation service
        image_url: String,
        /// Separate download URL, if the service issued one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        download_url: Option<String>,
        /// Generation seed
        #[serde(default)]
        seed: u64,
        /// Prompt used
        #[serde(default)]
        prompt: String,
        /// Output size
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Dimensions>,
    },
    /// A corrected image
    #[serde(rename_all = "camelCase")]
    CorrectedImage {
        /// URL of the source image
        original_url: String,
        /// URL of the corrected output
        corrected_url: String,
        /// Generation the source image came from
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_generation_id: Option<String>,
    },
    /// A generated video
    #[serde(rename_all = "camelCase")]
    Video {
        /// Playable URL
        #[serde(default)]
        video_url: String,
        /// MIME type of the video stream
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_mime_type: Option<String>,
        /// Persisted data URL copy of the video
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_data_url: Option<String>,
        /// Duration in seconds
        #[serde(default)]
        duration: f64,
        /// Frame rate
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fps: Option<f64>,
        /// Frame size
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resolution: Option<Dimensions>,
        /// Video codec name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        codec: Option<String>,
        /// Whether an audio track is present
        #[serde(default, skip_serializing_if = "Option::is_none")]
        has_audio: Option<bool>,
    },
    /// An uploaded image
    #[serde(rename_all = "camelCase")]
    UploadedImage {
        /// Image URL
        image_url: String,
        /// Image size
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimensions: Option<Dimensions>,
    },
    /// An uploaded video
    #[serde(rename_all = "camelCase")]
    UploadedVideo {
        /// Playable URL
        #[serde(default)]
        video_url: String,
        /// Duration in seconds
        #[serde(default)]
        duration: f64,
        /// Frame size
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimensions: Option<Dimensions>,
        /// Frame rate
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fps: Option<f64>,
    },
}

impl ContentData {
    /// The video URL, for video payloads.
    pub fn video_url(&self) -> Option<&str> {
        match self {
            ContentData::Video { video_url, .. } | ContentData::UploadedVideo { video_url, .. } => {
                Some(video_url.as_str())
            }
            _ => None,
        }
    }

    /// Replace the video URL of a video payload. Image payloads are unchanged.
    pub fn set_video_url(&mut self, url: impl Into<String>) {
        match self {
            ContentData::Video { video_url, .. } | ContentData::UploadedVideo { video_url, .. } => {
                *video_url = url.into();
            }
            _ => {}
        }
    }

    /// The declared MIME type of a video payload.
    pub fn video_mime_type(&self) -> Option<&str> {
        match self {
            ContentData::Video {
                video_mime_type, ..
            } => video_mime_type.as_deref(),
            _ => None,
        }
    }

    /// Every URL the payload carries, in the order the service issued them.
    pub fn urls(&self) -> Vec<&str> {
        match self {
            ContentData::GeneratedImage {
                image_url,
                download_url,
                ..
            } => std::iter::once(image_url.as_str())
                .chain(download_url.as_deref())
                .collect(),
            ContentData::CorrectedImage { corrected_url, .. } => vec![corrected_url.as_str()],
            ContentData::Video {
                video_url,
                video_data_url,
                ..
            } => std::iter::once(video_url.as_str())
                .chain(video_data_url.as_deref())
                .collect(),
            ContentData::UploadedImage { image_url, .. } => vec![image_url.as_str()],
            ContentData::UploadedVideo { video_url, .. } => vec![video_url.as_str()],
        }
    }
}

/// One piece of generated or uploaded media.
///
/// Any number of candidate references may be populated at once. The resolver
/// picks one of them, and records the mechanism that produced it in
/// `persistence_method`.
///
/// # Examples
///
/// ```
/// use mediaref_core::{ContentItem, ContentType, PersistenceMethod};
///
/// let item = ContentItem::builder()
///     .id("vid-1")
///     .content_type(ContentType::Video)
///     .display_url("blob:mediaref/abc123")
///     .folder_token("tok1")
///     .relative_path("clips/a.mp4")
///     .build()
///     .unwrap();
///
/// assert!(item.is_video());
/// assert_eq!(item.local_coordinates(), Some(("tok1", "clips/a.mp4")));
/// assert_eq!(item.persistence_method, PersistenceMethod::Blob);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct ContentItem {
    /// Unique id
    pub id: String,
    /// Media classification
    pub content_type: ContentType,
    /// File name on disk
    #[builder(default)]
    #[serde(default)]
    pub filename: String,
    /// Name the user or service gave the media
    #[builder(default)]
    #[serde(default)]
    pub original_name: String,
    /// Declared MIME type
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Primary renderable reference
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
    /// Gallery thumbnail
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Backup reference (object URL or cloud blob URL)
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_url: Option<String>,
    /// Object URL hydrated from a persisted data URL for playback
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_url: Option<String>,
    /// Raw filesystem path
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    /// Persistent token of the folder holding the file
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_token: Option<String>,
    /// Path of the file inside the token's folder
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    /// Where the bytes were persisted
    #[builder(default)]
    #[serde(default)]
    pub storage_mode: StorageMode,
    /// Mechanism backing the active reference
    #[builder(default)]
    #[serde(default)]
    pub persistence_method: PersistenceMethod,
    /// Payload-specific fields
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentData>,
    /// Lifecycle status
    #[builder(default)]
    #[serde(default)]
    pub status: ItemStatus,
    /// Explanation for an `error` status
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Creation time
    #[builder(default = "Utc::now()")]
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ContentItemBuilder {
    /// Build the ContentItem.
    ///
    /// # Errors
    ///
    /// Returns error if `id` or `content_type` is missing.
    pub fn build(&self) -> Result<ContentItem, String> {
        self.build_internal().map_err(|e| e.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl ContentItem {
    /// Creates a new content item builder.
    pub fn builder() -> ContentItemBuilder {
        ContentItemBuilder::default()
    }

    /// Whether this item holds video.
    pub fn is_video(&self) -> bool {
        self.content_type.is_video()
    }

    /// The payload's video URL, if this is a video item with one set.
    pub fn video_url(&self) -> Option<&str> {
        non_empty(self.content.as_ref().and_then(ContentData::video_url))
    }

    /// The reference the view renders first.
    ///
    /// Video items prefer their hydrated runtime URL, then the payload's video
    /// URL, then the display URL.
    pub fn primary_url(&self) -> Option<&str> {
        self.primary_candidates().into_iter().next()
    }

    /// Primary references in the order the view would try them.
    pub fn primary_candidates(&self) -> Vec<&str> {
        let mut candidates = Vec::new();
        if self.is_video() {
            candidates.extend(non_empty(self.runtime_url.as_deref()));
            candidates.extend(self.video_url());
        }
        candidates.extend(non_empty(self.display_url.as_deref()));
        candidates.dedup();
        candidates
    }

    /// Folder token and relative path, when both are present.
    pub fn local_coordinates(&self) -> Option<(&str, &str)> {
        Some((
            non_empty(self.folder_token.as_deref())?,
            non_empty(self.relative_path.as_deref())?,
        ))
    }

    /// Remote (`http`/`https`) references, backup field first.
    pub fn remote_candidates(&self) -> Vec<&str> {
        let mut candidates: Vec<&str> = Vec::new();
        let payload = self.content.as_ref().map(ContentData::urls).unwrap_or_default();
        let all = [self.blob_url.as_deref(), self.display_url.as_deref()]
            .into_iter()
            .flatten()
            .chain(payload);
        for url in all {
            if UrlKind::classify(url) == UrlKind::Remote && !candidates.contains(&url) {
                candidates.push(url);
            }
        }
        candidates
    }

    /// MIME type to tag bytes read for this item with.
    ///
    /// Uses the declared MIME type, then the video payload's, then the content
    /// type's fallback.
    pub fn effective_mime_type(&self) -> &str {
        non_empty(self.mime_type.as_deref())
            .or_else(|| self.content.as_ref().and_then(ContentData::video_mime_type))
            .unwrap_or_else(|| self.content_type.fallback_mime_type())
    }

    /// Apply a resolver patch in place.
    pub fn apply(&mut self, patch: &ContentPatch) {
        if let Some(url) = &patch.display_url {
            self.display_url = Some(url.clone());
        }
        if let Some(url) = &patch.video_url {
            if let Some(content) = self.content.as_mut() {
                content.set_video_url(url.clone());
            }
            if non_empty(self.runtime_url.as_deref()).is_some() {
                self.runtime_url = Some(url.clone());
            }
        }
        match &patch.thumbnail_url {
            ThumbnailUpdate::Keep => {}
            ThumbnailUpdate::Set(url) => self.thumbnail_url = Some(url.clone()),
            ThumbnailUpdate::Clear => self.thumbnail_url = None,
        }
        if let Some(method) = patch.persistence_method {
            self.persistence_method = method;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if patch.status.is_some() {
            self.error_message = patch.error_message.clone();
        }
    }
}
