//! S3 implementation of the blob store

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::store::{BlobStore, StoredBlob};

/// Blob store backed by an S3 bucket
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: String, public_url: String) -> Self {
        let public_url = public_url.trim_end_matches('/').to_string();
        Self {
            client,
            bucket,
            public_url,
        }
    }
}

/// Keep blob names predictable: anything outside a safe character set
/// becomes an underscore.
fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload_file(
        &self,
        user_id: Uuid,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredBlob> {
        let key = format!(
            "{}/{}-{}",
            user_id,
            Uuid::new_v4(),
            sanitize_file_name(file_name)
        );

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("failed to upload blob {}", key))?;

        info!("Uploaded blob: {}", key);

        let url = format!("{}/{}", self.public_url, key);
        Ok(StoredBlob { name: key, url })
    }

    async fn delete_file(&self, name: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .with_context(|| format!("failed to delete blob {}", name))?;

        info!("Deleted blob: {}", name);
        Ok(())
    }

    fn blob_name_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", self.public_url))
            .map(str::to_string)
    }
}
