use super::client::{ensure_success, SupabaseClient};
use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::error::Error;

/// SupabaseStorage implements StoragePort for a Supabase Storage bucket.
#[derive(Clone, Debug)]
pub struct SupabaseStorage {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn object_segments<'a>(&'a self, prefix: &'a [&'a str], key: &'a str) -> Vec<&'a str> {
        prefix
            .iter()
            .copied()
            .chain(std::iter::once(self.bucket.as_str()))
            .chain(key.split('/'))
            .collect()
    }
}

#[async_trait]
impl StoragePort for SupabaseStorage {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let url = self
            .client
            .endpoint(self.object_segments(&["storage", "v1", "object"], key))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        let segments = self.object_segments(&["storage", "v1", "object", "public"], key);
        match self.client.endpoint(segments) {
            Ok(url) => url.to_string(),
            Err(_) => format!("storage/v1/object/public/{}/{}", self.bucket, key),
        }
    }
}
