//! # pixedge store
//!
//! Storage collaborators of the pixedge image proxy.
//!
//! This crate provides:
//! - **Cache store**: URL-keyed store of complete HTTP responses
//! - **Object store**: key to bytes plus content-type metadata
//! - **Backends**: in-memory LRU cache, in-memory and filesystem object stores
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             pixedge-gateway             │
//! ├────────────────────┬────────────────────┤
//! │  CacheStore Trait  │ ObjectStore Trait  │
//! ├────────────────────┼──────────┬─────────┤
//! │  MemoryCacheStore  │  Memory  │  File   │
//! └────────────────────┴──────────┴─────────┘
//! ```
//!
//! Nothing here holds a reference into another store: every join is a key
//! lookup, so backends can be swapped independently.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{Result, StoreError};
pub use file::FileObjectStore;
pub use memory::{MemoryCacheStore, MemoryObjectStore};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

/// A complete response as held by the cache store
#[derive(Clone, Debug)]
pub struct CachedResponse {
    /// Response status
    pub status: StatusCode,
    /// Response headers, including the Cache-Control that allowed storage
    pub headers: HeaderMap,
    /// Full response body
    pub body: Bytes,
}

impl CachedResponse {
    /// Create a new cached response
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Metadata persisted with an uploaded object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Detected MIME type
    pub content_type: String,
    /// Object size in bytes
    pub size: u64,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
}

impl ObjectMetadata {
    /// Metadata for an object of `size` bytes uploaded now
    pub fn new(content_type: impl Into<String>, size: u64) -> Self {
        Self {
            content_type: content_type.into(),
            size,
            uploaded_at: Utc::now(),
        }
    }
}

/// An object read back from an object store
#[derive(Clone, Debug)]
pub struct StoredObject {
    pub data: Bytes,
    pub metadata: ObjectMetadata,
}

/// URL-keyed response cache.
///
/// Eviction is entirely up to the implementation.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a response by canonical cache key
    async fn lookup(&self, key: &str) -> Result<Option<CachedResponse>>;

    /// Store a response under a canonical cache key, replacing any previous entry
    async fn store(&self, key: &str, response: CachedResponse) -> Result<()>;
}

/// Durable key to bytes store. Last write wins.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object with its metadata
    async fn put(&self, key: &str, data: Bytes, metadata: ObjectMetadata) -> Result<()>;

    /// Read an object back
    async fn get(&self, key: &str) -> Result<Option<StoredObject>>;

    /// Whether the store survives a restart
    fn is_persistent(&self) -> bool {
        false
    }
}
