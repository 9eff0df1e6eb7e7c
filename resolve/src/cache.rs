//! Time-based on-disk cache for remote schemas.
//!
//! Each remote schema lives in the cache directory as
//! `<sha256(url) as hex>.schema.hcl`. A file younger than the freshness
//! window is reused without touching the network. Otherwise the schema is
//! downloaded into a temporary file in the same directory, checked against
//! the size cap, and renamed over the cache entry. Concurrent writers each
//! rename a complete file into place, so the last writer wins and readers
//! never see a partial download.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use hcl_schema_core::SCHEMA_EXTENSION;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::{ResolveError, Result};
use crate::fetch::{Fetcher, HttpFetcher};

/// Only remote references with this prefix are fetched.
pub const SECURE_PREFIX: &str = "https://";

/// File-backed cache of remote schemas.
pub struct RemoteSchemaCache<F = HttpFetcher> {
    fetcher: F,
    cache_dir: PathBuf,
    max_age: Duration,
    max_size: u64,
}

impl RemoteSchemaCache<HttpFetcher> {
    /// Creates a cache that downloads with [`HttpFetcher`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Request`] if the HTTP client cannot be built.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout())?;
        Ok(Self::new(fetcher, config))
    }
}

impl<F: Fetcher> RemoteSchemaCache<F> {
    /// Creates a cache that downloads with `fetcher`.
    pub fn new(fetcher: F, config: &CacheConfig) -> Self {
        Self {
            fetcher,
            cache_dir: config.cache_dir.clone(),
            max_age: config.max_age(),
            max_size: config.max_size_bytes,
        }
    }

    /// Directory holding cached schemas.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The fetcher used for downloads.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Path of the cache entry for `url`.
    pub fn entry_path(&self, url: &str) -> PathBuf {
        let hash = Sha256::digest(url.as_bytes());
        self.cache_dir.join(format!("{:x}{SCHEMA_EXTENSION}", hash))
    }

    /// Returns a local path holding the schema at `url`, downloading it if
    /// there is no fresh cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InsecureUrl`] for anything but `https://`,
    /// [`ResolveError::CacheDir`] if the cache directory cannot be created,
    /// and the download errors described on [`ResolveError`]. A failed or
    /// oversized download never leaves a cache entry behind.
    pub fn fetch(&self, url: &str) -> Result<PathBuf> {
        if !url.starts_with(SECURE_PREFIX) {
            return Err(ResolveError::InsecureUrl(url.to_string()));
        }

        fs::create_dir_all(&self.cache_dir).map_err(|source| ResolveError::CacheDir {
            path: self.cache_dir.clone(),
            source,
        })?;

        let path = self.entry_path(url);
        if self.is_fresh(&path) {
            info!(url, path = %path.display(), "using cached remote schema");
            return Ok(path);
        }

        info!(url, "downloading remote schema");
        self.download(url, &path)?;
        Ok(path)
    }

    fn is_fresh(&self, path: &Path) -> bool {
        let Ok(modified) = fs::metadata(path).and_then(|meta| meta.modified()) else {
            return false;
        };
        // A modification time in the future counts as fresh.
        modified
            .elapsed()
            .map_or(true, |age| age < self.max_age)
    }

    fn download(&self, url: &str, path: &Path) -> Result<()> {
        let response = self.fetcher.get(url)?;
        if response.status != 200 {
            return Err(ResolveError::Download(response.status_text));
        }

        let mut temp = tempfile::Builder::new()
            .prefix("tmp-")
            .suffix(SCHEMA_EXTENSION)
            .tempfile_in(&self.cache_dir)
            .map_err(ResolveError::TempFile)?;

        let mut limited = response.body.take(self.max_size + 1);
        let written = io::copy(&mut limited, &mut temp).map_err(ResolveError::Body)?;
        if written > self.max_size {
            return Err(ResolveError::TooLarge {
                limit: self.max_size,
            });
        }
        debug!(url, bytes = written, "downloaded remote schema");

        if let Err(err) = temp.persist(path) {
            warn!(
                error = %err.error,
                path = %path.display(),
                "rename into cache failed, copying instead"
            );
            fs::copy(err.file.path(), path)
                .map_err(ResolveError::Persist)?;
        }
        Ok(())
    }
}
