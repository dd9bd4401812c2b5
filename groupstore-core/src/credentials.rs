//! Credentials attached to outgoing requests.

use base64::{engine::general_purpose::STANDARD, Engine};

/// Supplies the ambient `Authorization` header for ordinary requests.
///
/// Injected into [`StoreClient`](crate::StoreClient) so callers and tests
/// can substitute their own source of credentials.
pub trait CredentialProvider: Send + Sync {
    /// Returns the `Authorization` header value, or `None` to send none.
    fn authorization(&self) -> Option<String>;
}

/// Sends no credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn authorization(&self) -> Option<String> {
        None
    }
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `Basic <base64 of "user:password">`.
    pub fn header_value(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

// Keep passwords out of debug output.
impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl CredentialProvider for BasicCredentials {
    fn authorization(&self) -> Option<String> {
        Some(self.header_value())
    }
}

/// Bearer token credentials.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl CredentialProvider for BearerToken {
    fn authorization(&self) -> Option<String> {
        Some(format!("Bearer {}", self.0))
    }
}
