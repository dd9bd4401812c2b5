use super::StoreClient;
use crate::error::StoreError;
use crate::patch::ResourcePatch;
use crate::resource::Version;

impl StoreClient {
    /// Applies `patch` to the resource at `url` as one read-modify-write.
    ///
    /// 1. Read the resource (checked against `expected` if given)
    /// 2. Apply the patch to the document that was read
    /// 3. Write the result conditioned on the version from step 1
    ///
    /// If another writer got in between the read and the write, the write
    /// fails with [`StoreError::Conflict`] and nothing is stored. There is
    /// exactly one read and one write; retrying is up to the caller.
    pub async fn edit(
        &self,
        url: &str,
        patch: &ResourcePatch,
        expected: Option<&Version>,
    ) -> Result<Option<Version>, StoreError> {
        let (version, data) = self.read(url, expected).await?.into_parts();

        let merged = patch.apply(data);

        // Condition on what was read, not on `expected`, which may be absent.
        self.replace(url, &version, &merged).await
    }
}
