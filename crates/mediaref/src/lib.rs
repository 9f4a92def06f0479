//! Mediaref - media reference resolution and lifecycle engine.
//!
//! Generated and uploaded media is referenced through short-lived object
//! URLs, self-contained data URLs, cloud URLs and files in a user-granted
//! folder. Mediaref keeps those references renderable: it detects dead
//! object URLs, re-reads bytes from disk, falls back to backup and remote
//! copies, and revokes what it minted on teardown.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mediaref::{MediaEngine, MediarefConfig, init_logging};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MediarefConfig::load()?;
//!     init_logging(config.logging())?;
//!
//!     let items = MediaEngine::load_items("items.json").await?;
//!     let engine = MediaEngine::new(&config, items).await?;
//!     let report = engine.hydrate_all().await;
//!     println!("{} items resolved", report.resolved());
//!
//!     engine.revoke_all().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Mediaref is organized as a workspace with focused crates:
//!
//! - `mediaref_error` - Error types
//! - `mediaref_core` - Content item model, patches and resolutions
//! - `mediaref_codec` - Chunked base64 and data URLs
//! - `mediaref_storage` - Sandboxed folder host and local file reader
//! - `mediaref_resolver` - Validator, resolution pipeline and lifecycle hooks
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod observability;

pub use config::{FolderGrant, MediarefConfig, NativeReaderConfig};
pub use engine::MediaEngine;
pub use observability::{LoggingConfig, init_logging};

pub use mediaref_codec::*;
pub use mediaref_core::*;
pub use mediaref_error::*;
pub use mediaref_resolver::*;
pub use mediaref_storage::*;
