//! groupstore core library
//!
//! Client for a hierarchical REST store of groups and users, with
//! optimistic concurrency through `ETag` version tokens.
//!
//! ```no_run
//! use groupstore_core::{ApiPaths, ResourcePatch, StoreClient};
//!
//! # async fn run() -> Result<(), groupstore_core::StoreError> {
//! let client = StoreClient::anonymous();
//! let paths = ApiPaths::new("http://localhost:8080/api");
//!
//! let group = client.read(&paths.group("admins"), None).await?;
//! let patch = ResourcePatch::new().set("title", "Administrators").delete("legacy");
//! client.edit(&paths.group("admins"), &patch, Some(&group.version)).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod patch;
pub mod paths;
pub mod resource;

pub use client::{parse_names, StoreClient};
pub use credentials::{Anonymous, BasicCredentials, BearerToken, CredentialProvider};
pub use error::{classify, StoreError};
pub use patch::{PatchValue, ResourcePatch};
pub use paths::ApiPaths;
pub use resource::{Document, RemoteResource, Version};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
