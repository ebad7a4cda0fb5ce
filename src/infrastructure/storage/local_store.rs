use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::StoragePath;

/// Filesystem-backed store for local development.
pub struct LocalArtifactStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_path: PathBuf) -> Result<Self, ArtifactStoreError> {
        std::fs::create_dir_all(&base_path)
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(
        &self,
        path: &StoragePath,
        payload: Bytes,
        _content_type: &str,
    ) -> Result<u64, ArtifactStoreError> {
        let store_path = StorePath::from(path.as_str());
        let size = payload.len() as u64;
        self.inner
            .put(&store_path, PutPayload::from(payload))
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
        format!("file://{}/{}", self.base_path.display(), path.as_str())
    }

    fn public_url(&self, path: &StoragePath) -> String {
        self.uri(path)
    }
}
