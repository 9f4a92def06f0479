//! Core data types for the mediaref media reference engine.
//!
//! A [`ContentItem`] is one piece of generated or uploaded media. It may carry
//! several candidate references at once (display URL, thumbnail, backup blob
//! URL, local folder coordinates); the resolver turns those into a single
//! renderable [`Resolution`] and writes it back as a [`ContentPatch`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod config;
mod content;
mod patch;
mod resolution;
mod url;

pub use blob::Blob;
pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use content::{
    ContentData, ContentItem, ContentItemBuilder, ContentType, Dimensions, ItemStatus,
    PersistenceMethod, StorageMode,
};
pub use patch::{ContentPatch, ThumbnailUpdate};
pub use resolution::{Resolution, Strategy};
pub use url::{UrlKind, is_well_formed_object_url};
