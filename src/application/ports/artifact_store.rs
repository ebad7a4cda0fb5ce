use bytes::Bytes;

use crate::domain::StoragePath;

/// Staging storage for temporary media objects handed to external backends.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn store(
        &self,
        path: &StoragePath,
        payload: Bytes,
        content_type: &str,
    ) -> Result<u64, ArtifactStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, ArtifactStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), ArtifactStoreError>;

    /// Storage-native address of a staged object, e.g. `s3://bucket/key`.
    fn uri(&self, path: &StoragePath) -> String;

    /// Address an external service can fetch the object from over HTTP.
    fn public_url(&self, path: &StoragePath) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}
