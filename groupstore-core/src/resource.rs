//! Resource documents and their version tokens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object document as stored by the server.
pub type Document = Map<String, Value>;

/// Opaque version token issued by the server in the `ETag` header.
///
/// The raw header value is kept verbatim (quotes and weak prefix included)
/// and only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Version {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A document read from the server together with the version it was read at.
///
/// Each read produces a fresh value; nothing is cached between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteResource {
    /// URL the document was read from
    #[serde(skip_serializing)]
    pub url: String,
    /// Version token returned with the document
    pub version: Version,
    /// Document body
    pub data: Document,
}

impl RemoteResource {
    /// Consumes the resource, returning its version and document.
    pub fn into_parts(self) -> (Version, Document) {
        (self.version, self.data)
    }
}
