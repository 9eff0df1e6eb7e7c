//! Remote schema cache configuration.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! standard behaviour: a cache under the system temporary directory, a
//! 24-hour freshness window, a 15-second request timeout and a 1 MiB size
//! cap.
//!
//! # Example YAML
//!
//! ```yaml
//! cache_dir: /var/cache/hclschema
//! max_age_secs: 3600
//! timeout_secs: 5
//! max_size_bytes: 262144
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Name of the cache directory under the system temporary directory.
pub const CACHE_DIR_NAME: &str = "hclschema-cache";

/// Default freshness window for cached remote schemas (24 hours).
pub const DEFAULT_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Default request timeout for remote schema downloads.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default cap on remote schema size (1 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 1 << 20;

/// Settings for [`RemoteSchemaCache`](crate::RemoteSchemaCache).
///
/// # Examples
///
/// ```
/// use hcl_schema_resolve::CacheConfig;
///
/// let config = CacheConfig::default();
/// assert_eq!(config.max_age().as_secs(), 86_400);
/// assert_eq!(config.timeout().as_secs(), 15);
/// assert!(config.cache_dir.ends_with("hclschema-cache"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cached remote schemas.
    pub cache_dir: PathBuf,
    /// How long a cached schema is reused without a network request.
    pub max_age_secs: u64,
    /// Request timeout for downloads.
    pub timeout_secs: u64,
    /// Largest accepted schema body.
    pub max_size_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: Self::default_dir(),
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
        }
    }
}

impl CacheConfig {
    /// Default cache directory (`<tmp>/hclschema-cache`).
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join(CACHE_DIR_NAME)
    }

    /// Loads configuration from a YAML file. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ResolveError::Io) if the file cannot be read,
    /// or [`Config`](crate::ResolveError::Config) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Returns a copy using `dir` as the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Freshness window as a [`Duration`].
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
