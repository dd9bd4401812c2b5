//! URL builders for groups and users.
//!
//! ```text
//! <root>/groups/                          group names (list)
//! <root>/groups/<group>                   group document
//! <root>/groups/<group>/users/            user names (list)
//! <root>/groups/<group>/users/<user>      user document
//! <root>/groups/<group>/users/<user>/password
//! ```
//!
//! A trailing slash marks a collection. Identifiers are encoded as a single
//! path segment.

use urlencoding::encode;

/// Builds resource URLs under a fixed API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
    root: String,
}

impl ApiPaths {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the API root without a trailing slash.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn groups(&self) -> String {
        format!("{}/groups/", self.root)
    }

    pub fn group(&self, group: &str) -> String {
        format!("{}/groups/{}", self.root, encode(group))
    }

    pub fn users(&self, group: &str) -> String {
        format!("{}/users/", self.group(group))
    }

    pub fn user(&self, group: &str, user: &str) -> String {
        format!("{}/users/{}", self.group(group), encode(user))
    }

    pub fn password(&self, group: &str, user: &str) -> String {
        format!("{}/password", self.user(group, user))
    }
}
