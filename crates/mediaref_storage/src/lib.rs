//! Local file access for the mediaref engine.
//!
//! Content items that were saved to disk carry a persistent folder token and
//! a relative path. This crate turns those coordinates back into bytes:
//!
//! - [`FolderHost`] is the host filesystem contract (token lookup, child
//!   lookup, binary read)
//! - [`SandboxedFolderHost`] implements it over the local filesystem
//! - [`NativeFileReader`] is the optional direct-path fast path
//! - [`LocalFileReader`] tries the native reader, then walks the folder tree
//!
//! MIME types are inferred from file extensions via [`mime_for_path`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod binary;
mod host;
mod mime;
mod native;
mod path;
mod reader;
mod sandbox;

pub use binary::BinaryResult;
pub use host::{Entry, EntryKind, FolderHost, ReadFormat};
pub use mime::{DEFAULT_MIME_TYPE, mime_for_extension, mime_for_path};
pub use native::{DirectPathReader, NativeFileReader, NativeRead};
pub use path::{path_segments, strip_base_prefix};
pub use reader::{FileLocation, LocalFile, LocalFileReader, ReadSource};
pub use sandbox::SandboxedFolderHost;
