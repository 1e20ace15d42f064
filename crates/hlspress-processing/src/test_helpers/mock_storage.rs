//! Mock Storage implementation for testing

use async_trait::async_trait;
use hlspress_core::{StorageBackend, UploadDescriptor};
use hlspress_storage::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock storage implementation that records uploads in memory, preserving
/// upload order and the descriptor each object was stored with.
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, UploadDescriptor)>>>,
    order: Arc<Mutex<Vec<String>>>,
    fail_after: Arc<Mutex<Option<usize>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            order: Arc::new(Mutex::new(Vec::new())),
            fail_after: Arc::new(Mutex::new(None)),
        }
    }

    /// Make `put_object` fail once `n` uploads have succeeded.
    pub fn fail_after(&self, n: usize) {
        *self.fail_after.lock().unwrap() = Some(n);
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn get_object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(data, _)| data.clone())
    }

    pub fn descriptor_of(&self, key: &str) -> Option<UploadDescriptor> {
        self.objects.lock().unwrap().get(key).map(|(_, d)| *d)
    }

    pub fn put_count(&self) -> usize {
        self.order.lock().unwrap().len()
    }

    /// Keys in the order they were uploaded.
    pub fn put_order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        descriptor: &UploadDescriptor,
    ) -> StorageResult<String> {
        if let Some(limit) = *self.fail_after.lock().unwrap() {
            if self.order.lock().unwrap().len() >= limit {
                return Err(StorageError::UploadFailed(format!(
                    "injected failure for {}",
                    key
                )));
            }
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, *descriptor));
        self.order.lock().unwrap().push(key.to_string());
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://mock.storage.example.com/{}", key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
