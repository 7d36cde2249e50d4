//! In-memory stores for development, testing and single-node caching

use crate::{CacheStore, CachedResponse, ObjectMetadata, ObjectStore, Result, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// LRU response cache held in process memory
#[derive(Clone)]
pub struct MemoryCacheStore {
    entries: Arc<Mutex<LruCache<String, CachedResponse>>>,
}

impl MemoryCacheStore {
    /// Create a cache holding at most `capacity` responses (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Number of cached responses
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether a canonical key is cached, without touching recency
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains(key)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn lookup(&self, key: &str) -> Result<Option<CachedResponse>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn store(&self, key: &str, response: CachedResponse) -> Result<()> {
        self.entries.lock().put(key.to_string(), response);
        Ok(())
    }
}

/// Object store held in process memory
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<DashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
        }
    }

    /// Get the number of objects stored
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get total size of all objects
    pub fn total_size(&self) -> u64 {
        self.objects.iter().map(|entry| entry.value().data.len() as u64).sum()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, data: Bytes, metadata: ObjectMetadata) -> Result<()> {
        self.objects.insert(key.to_string(), StoredObject { data, metadata });
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        Ok(self.objects.get(key).map(|entry| entry.value().clone()))
    }
}
