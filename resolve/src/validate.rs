//! Validation entry points.
//!
//! Both entry points return one flat, ordered list of diagnostics. Failures
//! to read, parse or fetch anything end the request early with whatever was
//! gathered so far; callers distinguish "invalid document" from "could not
//! check" by inspecting the diagnostics themselves.

use std::path::Path;

use hcl_schema_core::{
    Diagnostic, DiagnosticsExt, Document, SchemaTree, compile_schema, detect_schema_link,
    validate_document,
};
use tracing::{debug, info};

use crate::cache::RemoteSchemaCache;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::reference::{SchemaReference, resolve_reference};

/// Validates the document at `document_path` against the meta-schema at
/// `schema_path`.
///
/// The schema is parsed and compiled first; the document is only read once
/// the schema compiled cleanly.
pub fn validate_with_schema(
    schema_path: impl AsRef<Path>,
    document_path: impl AsRef<Path>,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let Some(tree) = load_schema(schema_path.as_ref(), &mut diags) else {
        return diags;
    };

    let doc = match Document::from_file(document_path) {
        Ok(doc) => doc,
        Err(diag) => {
            diags.push(diag);
            return diags;
        }
    };
    diags.extend(validate_document(&doc, &tree));
    diags
}

/// Parses and compiles a meta-schema, appending its diagnostics to `diags`.
fn load_schema(schema_path: &Path, diags: &mut Vec<Diagnostic>) -> Option<SchemaTree> {
    let schema_doc = match Document::from_file(schema_path) {
        Ok(doc) => doc,
        Err(diag) => {
            diags.push(diag);
            return None;
        }
    };
    let (tree, compile_diags) = compile_schema(&schema_doc);
    debug!(
        schema = %schema_path.display(),
        errors = compile_diags.error_count(),
        "compiled schema"
    );
    diags.extend(compile_diags);
    tree
}

/// Validates documents against the schema they link to through their root
/// `__schema` attribute, fetching remote schemas through a
/// [`RemoteSchemaCache`].
pub struct SchemaValidator<F = HttpFetcher> {
    cache: RemoteSchemaCache<F>,
}

impl SchemaValidator<HttpFetcher> {
    /// Creates a validator whose cache downloads over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Request`](crate::ResolveError::Request) if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(RemoteSchemaCache::from_config(config)?))
    }
}

impl<F: Fetcher> SchemaValidator<F> {
    /// Creates a validator using `cache` for remote schemas.
    pub fn new(cache: RemoteSchemaCache<F>) -> Self {
        Self { cache }
    }

    /// The remote schema cache.
    pub fn cache(&self) -> &RemoteSchemaCache<F> {
        &self.cache
    }

    /// Validates the document at `document_path` against the schema named by
    /// its `__schema` attribute.
    ///
    /// A document without a link yields no diagnostics. A relative local
    /// link is resolved against the document's directory; a remote link is
    /// fetched through the cache, and any fetch failure becomes a single
    /// error diagnostic.
    pub fn validate_linked(&self, document_path: impl AsRef<Path>) -> Vec<Diagnostic> {
        let document_path = document_path.as_ref();
        let doc = match Document::from_file(document_path) {
            Ok(doc) => doc,
            Err(diag) => return vec![diag],
        };

        let Some(link) = detect_schema_link(doc.source(), Some(&doc)) else {
            debug!(document = %document_path.display(), "no schema link");
            return Vec::new();
        };
        info!(
            document = %document_path.display(),
            schema = %link,
            "validating against linked schema"
        );

        let reference = SchemaReference::parse(&link);
        let schema_path = match resolve_reference(&reference, document_path, &self.cache) {
            Ok(path) => path,
            Err(err) => return vec![err.to_diagnostic()],
        };

        let mut diags = Vec::new();
        let Some(tree) = load_schema(&schema_path, &mut diags) else {
            return diags;
        };
        diags.extend(validate_document(&doc, &tree));
        diags
    }
}
