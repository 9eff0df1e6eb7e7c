//! Network access for remote schemas.
//!
//! [`RemoteSchemaCache`](crate::RemoteSchemaCache) talks to the network only
//! through the [`Fetcher`] trait, so tests (and embedders with their own
//! HTTP stack) can substitute it. [`HttpFetcher`] is the production
//! implementation on top of a blocking `reqwest` client.

use std::io::Read;
use std::time::Duration;

use tracing::debug;

use crate::error::{ResolveError, Result};

/// Status and streaming body of an HTTP GET.
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Status line text for diagnostics (e.g. `"404 Not Found"`).
    pub status_text: String,
    /// Response body, read incrementally.
    pub body: Box<dyn Read>,
}

impl FetchResponse {
    /// Builds a response from an in-memory body.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status.to_string(),
            body: Box::new(std::io::Cursor::new(body.into())),
        }
    }
}

/// Performs HTTP GET requests for remote schemas.
pub trait Fetcher {
    /// Issues a GET for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Download`] on transport failure. Non-200
    /// statuses are returned as responses, not errors.
    fn get(&self, url: &str) -> Result<FetchResponse>;
}

/// [`Fetcher`] backed by a blocking `reqwest` client with a request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Request`] if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hclschema/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ResolveError::Request(err.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        debug!(url, "requesting remote schema");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| ResolveError::Download(err.to_string()))?;
        let status = response.status();
        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.to_string(),
            body: Box::new(response),
        })
    }
}
