//! Reference resolution and lifecycle for mediaref content items.
//!
//! - [`ObjectUrlStore`] models the host's `blob:` URL registry
//! - [`BlobUrlValidator`] probes ephemeral references and converts dead
//!   object URLs into data URLs
//! - [`ReferenceResolver`] runs the fallback chain for one item and writes
//!   the result back through a [`ContentCollection`]
//! - [`MediaLifecycle`] hydrates a whole collection and revokes what the
//!   resolver minted on teardown

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod fetch;
mod ledger;
mod lifecycle;
mod object_url;
mod pipeline;
mod validator;

pub use collection::{ContentCollection, InMemoryCollection};
pub use fetch::{FetchedResource, HttpFetcher, ResourceFetcher, UrlFetcher};
pub use ledger::{MintLedger, MintRecord};
pub use lifecycle::{
    HydrationReport, HydrationState, ItemOutcome, ItemReport, MEDIA_UNAVAILABLE, MediaLifecycle,
};
pub use object_url::{ObjectUrlNaming, ObjectUrlStore};
pub use pipeline::{ReferenceResolver, ResolveOutcome};
pub use validator::BlobUrlValidator;
