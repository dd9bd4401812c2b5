use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;

use super::StoreClient;
use crate::credentials::BasicCredentials;
use crate::error::StoreError;

impl StoreClient {
    /// Sets a user's password.
    ///
    /// The body is the raw new password as `text/plain`. With
    /// `override_credentials` the ambient credentials are left off and the
    /// request authenticates as that user (typically with the old password).
    pub async fn set_password(
        &self,
        url: &str,
        new_password: &str,
        override_credentials: Option<&BasicCredentials>,
    ) -> Result<(), StoreError> {
        let builder = match override_credentials {
            Some(creds) => self
                .http
                .request(Method::POST, url)
                .header(AUTHORIZATION, creds.header_value()),
            None => self.request(Method::POST, url),
        };

        let builder = builder
            .header(CONTENT_TYPE, "text/plain")
            .body(new_password.to_string());

        self.execute(builder).await?;
        Ok(())
    }
}
