use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as StorePath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::StoragePath;

pub struct S3ArtifactStore {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
}

impl S3ArtifactStore {
    /// Credentials are read from the environment, matching how the rest of
    /// the AWS clients in this crate are configured.
    pub fn new(bucket: &str, region: &str) -> Result<Self, ArtifactStoreError> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region)
            .build()
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            bucket: bucket.to_string(),
            region: region.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn store(
        &self,
        path: &StoragePath,
        payload: Bytes,
        content_type: &str,
    ) -> Result<u64, ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        let size = payload.len() as u64;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let mut options = PutOptions::default();
        options.attributes = attributes;

        self.inner
            .put_opts(&store_path, PutPayload::from(payload), options)
            .await
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;

        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| ArtifactStoreError::NotFound(e.to_string()))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| ArtifactStoreError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| ArtifactStoreError::DeleteFailed(e.to_string()))
    }

    fn uri(&self, path: &StoragePath) -> String {
        format!("s3://{}/{}", self.bucket, path.as_str())
    }

    fn public_url(&self, path: &StoragePath) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket,
            self.region,
            path.as_str()
        )
    }
}
