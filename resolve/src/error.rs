//! Error types for schema resolution.
//!
//! Covers every way locating a schema can fail: configuration loading,
//! insecure references, network failures, oversized downloads and cache
//! directory problems. At the API boundary errors become
//! [`Diagnostic`]s via [`ResolveError::to_diagnostic`]; the `Display` text is
//! the diagnostic summary and [`ResolveError::detail`] its detail.

use std::path::PathBuf;

use hcl_schema_core::Diagnostic;
use thiserror::Error;

/// Errors that can occur while resolving a schema reference.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Configuration file could not be read.
    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid YAML for [`CacheConfig`](crate::CacheConfig).
    #[error("invalid configuration")]
    Config(#[from] serde_yaml::Error),

    /// Remote reference does not use `https://`.
    #[error("insecure schema URL")]
    InsecureUrl(String),

    /// Cache directory could not be created.
    #[error("failed to create cache dir")]
    CacheDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying failure.
        source: std::io::Error,
    },

    /// HTTP client or request could not be built.
    #[error("failed to create request")]
    Request(String),

    /// Transport failure or non-200 response.
    #[error("failed to download schema")]
    Download(String),

    /// Temporary download file could not be created.
    #[error("failed to create temp file")]
    TempFile(std::io::Error),

    /// Response body could not be read.
    #[error("failed to read schema body")]
    Body(std::io::Error),

    /// Response body exceeded the configured size cap.
    #[error("schema too large")]
    TooLarge {
        /// Size cap in bytes.
        limit: u64,
    },

    /// Downloaded file could not be moved into the cache.
    #[error("failed to cache schema")]
    Persist(std::io::Error),
}

impl ResolveError {
    /// Human-readable detail for the diagnostic produced from this error.
    pub fn detail(&self) -> String {
        match self {
            Self::Io(err) | Self::TempFile(err) | Self::Body(err) | Self::Persist(err) => {
                err.to_string()
            }
            Self::Config(err) => err.to_string(),
            Self::InsecureUrl(url) => {
                format!("only https:// URLs are allowed for remote schemas (got {url})")
            }
            Self::CacheDir { path, source } => format!("{}: {source}", path.display()),
            Self::Request(detail) | Self::Download(detail) => detail.clone(),
            Self::TooLarge { limit } => {
                format!("remote schema exceeds maximum allowed size of {limit} bytes")
            }
        }
    }

    /// Converts the error into an error-severity diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .with_detail(self.detail())
    }
}

/// Convenience alias for results with [`ResolveError`].
pub type Result<T> = std::result::Result<T, ResolveError>;
