//! HTTP client for versioned store resources.
//!
//! Every mutable resource carries an opaque version (its `ETag`). Reads
//! return the version with the document, writes present the version they
//! were based on, and the server rejects any write whose version is stale.
//! The client keeps no per-resource state between calls; the server is the
//! only arbiter of conflicts.
//!
//! ## Wire contract
//!
//! - Collections answer `GET` with names separated by `\n`
//! - Documents are `application/json`, and every successful read carries `ETag`
//! - Conditioned writes send `If-Match: <version>`
//! - Creates send `If-None-Match: *`
//! - 412 and 428 mean the precondition failed

mod edit;
mod list;
mod password;
mod read;
mod write;

pub use list::parse_names;

use std::sync::Arc;

use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderValue, AUTHORIZATION, ETAG};
use reqwest::{Method, RequestBuilder, Response};

use crate::credentials::{Anonymous, CredentialProvider};
use crate::error::{classify, StoreError};
use crate::resource::Version;

/// Client for a versioned REST store.
///
/// Cheap to clone; clones share one connection pool and credential provider.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl StoreClient {
    /// Creates a client that authenticates with the given provider.
    pub fn new(credentials: impl CredentialProvider + 'static) -> Self {
        Self::with_client(reqwest::Client::new(), credentials)
    }

    /// Creates a client that sends no credentials.
    pub fn anonymous() -> Self {
        Self::new(Anonymous)
    }

    /// Wraps an existing reqwest client, e.g. one built with a timeout.
    pub fn with_client(
        http: reqwest::Client,
        credentials: impl CredentialProvider + 'static,
    ) -> Self {
        Self {
            http,
            credentials: Arc::new(credentials),
        }
    }

    /// Starts a request carrying the ambient credentials.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.credentials.authorization() {
            Some(auth) => builder.header(AUTHORIZATION, auth),
            None => builder,
        }
    }

    /// Sends a request, turning any non-success status into a [`StoreError`].
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, StoreError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().to_string();

        tracing::debug!(%method, %url, "sending request");
        let response = self.http.execute(request).await?;

        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "received response");

        if !status.is_success() {
            let reason = reason_phrase(&response);
            return Err(classify(status.as_u16(), reason.as_deref()));
        }
        Ok(response)
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient").finish_non_exhaustive()
    }
}

/// Returns the status text the server sent.
///
/// hyper only records the phrase when it differs from the standard one for
/// the code (an empty phrase included), so the standard phrase is the
/// fallback. Unregistered codes have none.
fn reason_phrase(response: &Response) -> Option<String> {
    match response.extensions().get::<ReasonPhrase>() {
        Some(phrase) => Some(String::from_utf8_lossy(phrase.as_bytes()).into_owned()),
        None => response.status().canonical_reason().map(str::to_string),
    }
}

/// Extracts the version token from a response, if the server sent one.
///
/// The token is kept byte for byte; one that is not visible ASCII fails
/// with [`StoreError::UnreadableVersion`].
fn response_version(response: &Response) -> Result<Option<Version>, StoreError> {
    response
        .headers()
        .get(ETAG)
        .map(|value| header_to_version(response.url().as_str(), value))
        .transpose()
}

fn header_to_version(url: &str, value: &HeaderValue) -> Result<Version, StoreError> {
    value
        .to_str()
        .map(Version::new)
        .map_err(|_| StoreError::UnreadableVersion {
            url: url.to_string(),
        })
}
