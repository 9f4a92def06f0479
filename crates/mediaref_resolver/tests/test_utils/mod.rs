//! Test utilities for resolver tests.
//!
//! Provides a mock remote fetcher, a gated collection and a harness wiring a
//! resolver over a temporary granted folder.

pub mod gated;
pub mod harness;
pub mod mock_remote;

#[allow(unused_imports)]
pub use gated::GatedCollection;
#[allow(unused_imports)]
pub use harness::Harness;
#[allow(unused_imports)]
pub use mock_remote::MockRemote;
