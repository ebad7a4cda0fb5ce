use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::config::{StorageProviderSetting, StorageSettings};

use super::local_store::LocalArtifactStore;
use super::memory_store::InMemoryArtifactStore;
use super::s3_store::S3ArtifactStore;

pub struct ArtifactStoreFactory;

impl ArtifactStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn ArtifactStore>, ArtifactStoreError> {
        match settings.provider {
            StorageProviderSetting::S3 => {
                let store = S3ArtifactStore::new(&settings.bucket, &settings.region)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let store = LocalArtifactStore::new(path)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => Ok(Arc::new(InMemoryArtifactStore::new())),
        }
    }
}
