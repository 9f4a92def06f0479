//! Configuration loading.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from mediaref.toml)
//! - User overrides (./mediaref.toml or ~/.config/mediaref/mediaref.toml)
//! - Automatic merging with user values taking precedence

use crate::LoggingConfig;
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use mediaref_core::ResolverConfig;
use mediaref_error::{ConfigError, MediarefError, MediarefResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A persistent folder grant registered at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct FolderGrant {
    /// Opaque token items refer to
    token: String,
    /// Native path of the folder
    path: String,
}

impl FolderGrant {
    /// Grant `path` under `token`.
    pub fn new(token: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            path: path.into(),
        }
    }
}

/// Native reader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct NativeReaderConfig {
    /// Offer the direct-path reader as the fast path
    #[serde(default = "default_native_enabled")]
    enabled: bool,
}

fn default_native_enabled() -> bool {
    true
}

impl Default for NativeReaderConfig {
    fn default() -> Self {
        Self {
            enabled: default_native_enabled(),
        }
    }
}

/// Top-level mediaref configuration.
///
/// Loads from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from mediaref.toml)
/// 2. User override (~/.config/mediaref/mediaref.toml, then ./mediaref.toml)
///
/// # Example
///
/// ```no_run
/// use mediaref::MediarefConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MediarefConfig::load()?;
/// println!("Probe timeout: {}s", config.resolver().probe_timeout_secs());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct MediarefConfig {
    /// Resolution pipeline settings
    #[serde(default)]
    resolver: ResolverConfig,

    /// Folder grants to register
    #[serde(default)]
    folders: Vec<FolderGrant>,

    /// Logging settings
    #[serde(default)]
    logging: LoggingConfig,

    /// Native reader settings
    #[serde(default)]
    native_reader: NativeReaderConfig,
}

impl MediarefConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MediarefResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                MediarefError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MediarefError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (mediaref.toml shipped with the library)
    /// 2. User config in home directory (~/.config/mediaref/mediaref.toml)
    /// 3. User config in current directory (./mediaref.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> MediarefResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../mediaref.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/mediaref/mediaref.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("mediaref").required(false));

        builder
            .build()
            .map_err(|e| {
                MediarefError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MediarefError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
