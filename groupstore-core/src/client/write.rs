use reqwest::header::{IF_MATCH, IF_NONE_MATCH};
use reqwest::Method;

use super::{response_version, StoreClient};
use crate::error::StoreError;
use crate::resource::{Document, Version};

impl StoreClient {
    /// Creates a resource that must not exist yet.
    ///
    /// Sends `If-None-Match: *`; an existing resource fails with
    /// [`StoreError::Conflict`]. `data` defaults to an empty object.
    /// Returns the new version when the server reports one.
    pub async fn create(
        &self,
        url: &str,
        data: Option<&Document>,
    ) -> Result<Option<Version>, StoreError> {
        let empty = Document::new();
        let builder = self
            .request(Method::PUT, url)
            .header(IF_NONE_MATCH, "*")
            .json(data.unwrap_or(&empty));

        let response = self.execute(builder).await?;
        response_version(&response)
    }

    /// Replaces a resource, provided it is still at `version`.
    ///
    /// A resource changed or deleted since `version` was read fails with
    /// [`StoreError::Conflict`]. Returns the new version when the server
    /// reports one.
    pub async fn replace(
        &self,
        url: &str,
        version: &Version,
        data: &Document,
    ) -> Result<Option<Version>, StoreError> {
        let builder = self
            .request(Method::PUT, url)
            .header(IF_MATCH, version.as_str())
            .json(data);

        let response = self.execute(builder).await?;
        response_version(&response)
    }

    /// Deletes a resource.
    ///
    /// With a version the delete only succeeds if the resource is still at
    /// that version; without one it is unconditional.
    pub async fn remove(&self, url: &str, version: Option<&Version>) -> Result<(), StoreError> {
        let mut builder = self.request(Method::DELETE, url);
        if let Some(version) = version {
            builder = builder.header(IF_MATCH, version.as_str());
        }

        self.execute(builder).await?;
        Ok(())
    }
}
