use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::StoragePath;

/// In-memory store used by tests and scaffold mode. Records every store and
/// delete call so tests can assert on artifact lifecycles.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    objects: Mutex<HashMap<String, Bytes>>,
    store_calls: Mutex<Vec<String>>,
    delete_calls: Mutex<Vec<String>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_paths(&self) -> Vec<String> {
        self.store_calls.lock().unwrap().clone()
    }

    pub fn deleted_paths(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn delete_count(&self, path: &StoragePath) -> usize {
        self.delete_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path.as_str())
            .count()
    }

    pub fn contains(&self, path: &StoragePath) -> bool {
        self.objects.lock().unwrap().contains_key(path.as_str())
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn store(
        &self,
        path: &StoragePath,
        payload: Bytes,
        _content_type: &str,
    ) -> Result<u64, ArtifactStoreError> {
        let size = payload.len() as u64;
        self.store_calls.lock().unwrap().push(path.as_str().to_string());
        self.objects
            .lock()
            .unwrap()
            .insert(path.as_str().to_string(), payload);
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, ArtifactStoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(path.as_str())
            .map(|b| b.to_vec())
            .ok_or_else(|| ArtifactStoreError::NotFound(path.as_str().to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), ArtifactStoreError> {
        self.delete_calls.lock().unwrap().push(path.as_str().to_string());
        match self.objects.lock().unwrap().remove(path.as_str()) {
            Some(_) => Ok(()),
            None => Err(ArtifactStoreError::NotFound(path.as_str().to_string())),
        }
    }

    fn uri(&self, path: &StoragePath) -> String {
        format!("mem://{}", path.as_str())
    }

    fn public_url(&self, path: &StoragePath) -> String {
        format!("https://artifacts.invalid/{}", path.as_str())
    }
}
