//! The object storage seam.
//!
//! [`BlobStore`] is a flat bucket/key byte store. [`MemoryBlobStore`] keeps
//! objects in process memory and backs tests and local runs.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{HalError, HalResult};

/// Bucket/key object storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether an object exists at `key`.
    async fn exists(&self, bucket: &str, key: &str) -> HalResult<bool>;

    /// Write an object, replacing any previous content.
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> HalResult<()>;

    /// Read an object. Fails with [`HalError::ObjectNotFound`] if absent.
    async fn get(&self, bucket: &str, key: &str) -> HalResult<Vec<u8>>;

    /// Delete an object.
    async fn delete(&self, bucket: &str, key: &str) -> HalResult<()>;
}

/// In-memory blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<FxHashMap<(String, String), Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys present in `bucket`, sorted.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let objects = self.objects.read().await;
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, bucket: &str, key: &str) -> HalResult<bool> {
        let objects = self.objects.read().await;
        Ok(objects.contains_key(&(bucket.to_string(), key.to_string())))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> HalResult<()> {
        debug!(bucket, key, bytes = body.len(), "Storing object");
        let mut objects = self.objects.write().await;
        objects.insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> HalResult<Vec<u8>> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| HalError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn delete(&self, bucket: &str, key: &str) -> HalResult<()> {
        debug!(bucket, key, "Deleting object");
        let mut objects = self.objects.write().await;
        objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
