use reqwest::Method;

use super::StoreClient;
use crate::error::StoreError;

impl StoreClient {
    /// Lists the names in a collection, in server order.
    ///
    /// `url` is a collection URL, conventionally ending in `/`.
    pub async fn list(&self, url: &str) -> Result<Vec<String>, StoreError> {
        let response = self.execute(self.request(Method::GET, url)).await?;
        let body = response.text().await?;
        Ok(parse_names(&body))
    }
}

/// Splits a newline-separated name list.
///
/// A trailing line feed does not produce an empty final name.
pub fn parse_names(body: &str) -> Vec<String> {
    let mut names: Vec<String> = body.split('\n').map(str::to_string).collect();
    if names.last().is_some_and(|last| last.is_empty()) {
        names.pop();
    }
    names
}
