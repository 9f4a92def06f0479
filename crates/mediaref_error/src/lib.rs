//! Error types for the mediaref workspace.
//!
//! This crate provides the foundation error types shared by every mediaref crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The three errors the resolution engine surfaces to its callers are
//! [`EncodingError`], [`FileUnavailableError`] and [`ReferenceUnresolvedError`].
//!
//! # Examples
//!
//! ```
//! use mediaref_error::{MediarefResult, HttpError};
//!
//! fn fetch_data() -> MediarefResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod encoding;
mod error;
mod file;
mod http;
mod json;
mod reference;
mod storage;

pub use config::ConfigError;
pub use encoding::{EncodingError, EncodingErrorKind};
pub use error::{MediarefError, MediarefErrorKind, MediarefResult};
pub use file::FileUnavailableError;
pub use http::HttpError;
pub use json::JsonError;
pub use reference::ReferenceUnresolvedError;
pub use storage::{StorageError, StorageErrorKind};
