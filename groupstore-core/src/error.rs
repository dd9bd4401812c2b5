//! Store error types and status classification.

use thiserror::Error;

use crate::resource::Version;

/// Errors returned by store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("401 {reason}")]
    Unauthorized { reason: String },

    #[error("403 {reason}")]
    Forbidden { reason: String },

    #[error("404 {reason}")]
    NotFound { reason: String },

    /// The server refused a conditioned request (412 or 428).
    #[error("Conflict ({status} {reason}): resource changed since it was read")]
    Conflict { status: u16, reason: String },

    /// The server answered with a different version than the caller expected.
    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: Version, actual: Version },

    /// A successful read came back without an `ETag` header.
    #[error("Protocol violation: response for {url} carries no version")]
    MissingVersion { url: String },

    /// A response carried an `ETag` that is not visible ASCII.
    #[error("Protocol violation: response for {url} carries an unreadable version")]
    UnreadableVersion { url: String },

    #[error("Server error: {status} {reason}")]
    Server { status: u16, reason: String },

    /// The response body is not a JSON object.
    #[error("Invalid document from {url}: {message}")]
    InvalidDocument { url: String, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl StoreError {
    /// Returns the HTTP status behind this error, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Unauthorized { .. } => Some(401),
            StoreError::Forbidden { .. } => Some(403),
            StoreError::NotFound { .. } => Some(404),
            StoreError::Conflict { status, .. } | StoreError::Server { status, .. } => {
                Some(*status)
            }
            StoreError::Transport(e) => e.status().map(|s| s.as_u16()),
            StoreError::VersionMismatch { .. }
            | StoreError::MissingVersion { .. }
            | StoreError::UnreadableVersion { .. }
            | StoreError::InvalidDocument { .. } => None,
        }
    }

    /// True for every kind of version conflict, whether the server or the
    /// client detected it.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::Conflict { .. } | StoreError::VersionMismatch { .. }
        )
    }

    /// True when the server reported success but broke the wire contract.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            StoreError::MissingVersion { .. } | StoreError::UnreadableVersion { .. }
        )
    }
}

/// Turns a non-success status into a [`StoreError`].
///
/// `reason` is the status text the server sent. When it is
/// missing or blank, 401/403/404 get a fixed phrase and every other code
/// falls back to the bare number.
pub fn classify(status: u16, reason: Option<&str>) -> StoreError {
    let reason = match reason.map(str::trim).filter(|r| !r.is_empty()) {
        Some(r) => r.to_string(),
        None => default_reason(status),
    };

    match status {
        401 => StoreError::Unauthorized { reason },
        403 => StoreError::Forbidden { reason },
        404 => StoreError::NotFound { reason },
        412 | 428 => StoreError::Conflict { status, reason },
        _ => StoreError::Server { status, reason },
    }
}

fn default_reason(status: u16) -> String {
    match status {
        401 => "Unauthorised".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Not Found".to_string(),
        _ => status.to_string(),
    }
}
