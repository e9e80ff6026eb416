use async_trait::async_trait;
use bytes::Bytes;
use std::error::Error;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Upload an object under `key`. Fails instead of replacing an existing
    /// object.
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Publicly reachable URL for an uploaded object
    fn public_url(&self, key: &str) -> String;
}
