//! Classification and resolution of schema references.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::RemoteSchemaCache;
use crate::error::Result;
use crate::fetch::Fetcher;

/// Prefixes that mark a reference as remote. Only `https://` is fetched;
/// `http://` is classified as remote so that it can be rejected.
const REMOTE_PREFIXES: [&str; 2] = ["https://", "http://"];

/// A schema reference as written in a document's `__schema` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaReference {
    /// URL of a schema to fetch through the cache.
    Remote(String),
    /// Filesystem path, relative to the referencing document unless absolute.
    Local(PathBuf),
}

impl SchemaReference {
    /// Classifies a raw reference string.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use hcl_schema_resolve::SchemaReference;
    ///
    /// assert_eq!(
    ///     SchemaReference::parse("https://example.com/a.schema.hcl"),
    ///     SchemaReference::Remote("https://example.com/a.schema.hcl".into())
    /// );
    /// assert_eq!(
    ///     SchemaReference::parse("schemas/a.schema.hcl"),
    ///     SchemaReference::Local(PathBuf::from("schemas/a.schema.hcl"))
    /// );
    /// ```
    pub fn parse(reference: &str) -> Self {
        if REMOTE_PREFIXES.iter().any(|p| reference.starts_with(p)) {
            Self::Remote(reference.to_string())
        } else {
            Self::Local(PathBuf::from(reference))
        }
    }

    /// Returns true for remote references.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Resolves `reference` to a local schema path.
///
/// Local references are joined onto the directory containing
/// `document_path` unless already absolute; the file is not checked for
/// existence here. Remote references go through `cache`.
///
/// # Errors
///
/// Propagates [`RemoteSchemaCache::fetch`] errors for remote references.
pub fn resolve_reference<F: Fetcher>(
    reference: &SchemaReference,
    document_path: &Path,
    cache: &RemoteSchemaCache<F>,
) -> Result<PathBuf> {
    let resolved = match reference {
        SchemaReference::Remote(url) => cache.fetch(url)?,
        SchemaReference::Local(path) if path.is_absolute() => path.clone(),
        SchemaReference::Local(path) => document_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(path),
    };
    debug!(
        document = %document_path.display(),
        schema = %resolved.display(),
        "resolved schema reference"
    );
    Ok(resolved)
}
