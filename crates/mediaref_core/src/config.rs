//! Resolver configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Settings injected into the resolution pipeline.
///
/// The base folder token and path are the values recorded when the user
/// granted the output folder; relative paths that still carry the base path
/// as a prefix are trimmed against it.
///
/// # Examples
///
/// ```
/// use mediaref_core::ResolverConfig;
///
/// let config = ResolverConfig::builder()
///     .base_folder_token("tok1")
///     .base_folder_path("/Users/me/Generations")
///     .probe_timeout_secs(5u64)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.default_mime_type(), "image/jpeg");
/// assert_eq!(*config.probe_timeout_secs(), 5);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default, setter(into))]
pub struct ResolverConfig {
    /// Token of the granted base folder
    #[serde(default)]
    #[builder(setter(strip_option))]
    #[setters(strip_option)]
    base_folder_token: Option<String>,

    /// Native path of the granted base folder
    #[serde(default)]
    #[builder(setter(strip_option))]
    #[setters(strip_option)]
    base_folder_path: Option<String>,

    /// MIME type used when a file extension is unknown
    #[serde(default = "default_mime_type")]
    default_mime_type: String,

    /// Timeout for remote existence probes and fetches (seconds)
    #[serde(default = "default_probe_timeout_secs")]
    probe_timeout_secs: u64,

    /// Origin segment of minted object URLs
    #[serde(default = "default_object_url_origin")]
    object_url_origin: String,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_object_url_origin() -> String {
    "mediaref".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_folder_token: None,
            base_folder_path: None,
            default_mime_type: default_mime_type(),
            probe_timeout_secs: default_probe_timeout_secs(),
            object_url_origin: default_object_url_origin(),
        }
    }
}

impl ResolverConfig {
    /// Creates a new resolver config builder.
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::default()
    }

    /// Probe timeout as a duration.
    pub fn probe_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.probe_timeout_secs)
    }
}
