//! Schema resolution and validation entry points.
//!
//! This crate locates the meta-schema governing a document and runs the
//! compiler and validator from `hcl-schema-core` against it:
//!
//! - [`validate_with_schema`] validates a document against an explicit
//!   schema file.
//! - [`SchemaValidator::validate_linked`] follows the document's `__schema`
//!   attribute, resolving relative paths against the document's directory
//!   and fetching `https://` schemas through a [`RemoteSchemaCache`].
//!
//! Remote schemas are cached on disk for a configurable freshness window
//! (24 hours by default, see [`CacheConfig`]). Downloads go through the
//! [`Fetcher`] trait; [`HttpFetcher`] is the `reqwest` implementation.
//!
//! # Example
//!
//! ```no_run
//! use hcl_schema_resolve::{CacheConfig, SchemaValidator};
//!
//! # fn main() -> Result<(), hcl_schema_resolve::ResolveError> {
//! let validator = SchemaValidator::from_config(&CacheConfig::default())?;
//! for diag in validator.validate_linked("service.hcl") {
//!     eprintln!("{diag}");
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod error;
mod fetch;
mod reference;
mod validate;

pub use cache::{RemoteSchemaCache, SECURE_PREFIX};
pub use config::{
    CACHE_DIR_NAME, CacheConfig, DEFAULT_MAX_AGE_SECS, DEFAULT_MAX_SIZE_BYTES,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{ResolveError, Result};
pub use fetch::{FetchResponse, Fetcher, HttpFetcher};
pub use reference::{SchemaReference, resolve_reference};
pub use validate::{SchemaValidator, validate_with_schema};
