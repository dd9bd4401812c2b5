use reqwest::header::{ACCEPT, IF_MATCH};
use reqwest::Method;
use serde_json::Value;

use super::{response_version, StoreClient};
use crate::error::StoreError;
use crate::resource::{Document, RemoteResource, Version};

impl StoreClient {
    /// Reads a document and the version it is at.
    ///
    /// With `expected` set, the request carries `If-Match` so the server can
    /// refuse early, and the returned version is still checked here: a
    /// different version fails with [`StoreError::VersionMismatch`]. A
    /// success response without `ETag` fails with
    /// [`StoreError::MissingVersion`], and one whose `ETag` is not
    /// readable text with [`StoreError::UnreadableVersion`].
    pub async fn read(
        &self,
        url: &str,
        expected: Option<&Version>,
    ) -> Result<RemoteResource, StoreError> {
        let mut builder = self
            .request(Method::GET, url)
            .header(ACCEPT, "application/json");
        if let Some(version) = expected {
            builder = builder.header(IF_MATCH, version.as_str());
        }

        let response = self.execute(builder).await?;

        let version = response_version(&response)?.ok_or_else(|| StoreError::MissingVersion {
            url: url.to_string(),
        })?;

        if let Some(expected) = expected {
            if *expected != version {
                return Err(StoreError::VersionMismatch {
                    expected: expected.clone(),
                    actual: version,
                });
            }
        }

        let body = response.bytes().await?;
        let data = parse_document(url, &body)?;

        Ok(RemoteResource {
            url: url.to_string(),
            version,
            data,
        })
    }
}

/// Parses a response body that must be a JSON object.
fn parse_document(url: &str, body: &[u8]) -> Result<Document, StoreError> {
    let invalid = |message: String| StoreError::InvalidDocument {
        url: url.to_string(),
        message,
    };

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(invalid(format!("expected a JSON object, got {}", kind(&other)))),
        Err(e) => Err(invalid(e.to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
