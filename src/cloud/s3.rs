use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use log::debug;
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};

use crate::cloud::client::create_s3_client;
use crate::config::{Acl, UploadConfig};

/// An object store that accepts whole objects in a single call.
///
/// This is the only operation the put stage needs. Implementations must not
/// retry internally; a failed put is reported to the caller as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object
    async fn put(&self, key: &str, body: Bytes, content_type: &str, acl: Acl) -> Result<()>;
}

/// [`ObjectStore`] backed by an S3 bucket.
pub struct S3Store {
    client: S3Client,
    bucket: String,
}

impl S3Store {
    /// Wrap an existing client for the given bucket
    pub fn new(client: S3Client, bucket: &str) -> Self {
        S3Store {
            client,
            bucket: bucket.to_string(),
        }
    }

    /// Build a client from the configuration and target the configured bucket
    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        let client = create_s3_client(config)?;
        Ok(Self::new(client, &config.bucket))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, body: Bytes, content_type: &str, acl: Acl) -> Result<()> {
        let size = body.len();
        let request = PutObjectRequest {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            body: Some(ByteStream::new_with_size(stream::iter(vec![Ok::<_, std::io::Error>(body)]), size)),
            content_length: Some(size as i64),
            content_type: Some(content_type.to_string()),
            acl: Some(acl.as_str().to_string()),
            ..Default::default()
        };

        let output = self.client.put_object(request).await
            .with_context(|| format!("Failed to upload s3://{}/{}", self.bucket, key))?;

        debug!("Stored s3://{}/{} ({} bytes, etag {:?})",
               self.bucket, key, size, output.e_tag);
        Ok(())
    }
}
