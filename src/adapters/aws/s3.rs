use crate::ports::storage::StoragePort;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::error::Error;

/// S3Adapter implements StoragePort for AWS S3.
#[derive(Clone)]
pub struct S3Adapter {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Adapter {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Virtual-hosted style endpoint of a bucket.
    pub fn bucket_url(bucket: &str, region: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com", bucket, region)
    }
}

#[async_trait]
impl StoragePort for S3Adapter {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            // Conditional write: 412 if the key is already taken.
            .if_none_match("*")
            .body(ByteStream::from(data))
            .send()
            .await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
