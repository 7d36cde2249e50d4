//! Cache store adapter
//!
//! Reads fail open: a store error is a miss. Writes are gated by the
//! response's Cache-Control and run as detached background tasks, so
//! neither their latency nor their failure reaches the caller.

use crate::background::TaskSpawner;
use futures::FutureExt;
use http::header::CACHE_CONTROL;
use pixedge_core::{canonical_cache_key, is_storable};
use pixedge_store::{CacheStore, CachedResponse};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Policy-aware access to the response cache
#[derive(Clone)]
pub struct CacheAdapter {
    store: Arc<dyn CacheStore>,
    spawner: Arc<dyn TaskSpawner>,
}

impl CacheAdapter {
    /// Create an adapter over a cache store and a background executor
    pub fn new(store: Arc<dyn CacheStore>, spawner: Arc<dyn TaskSpawner>) -> Self {
        Self { store, spawner }
    }

    /// Look up the cached response for a request URL
    pub async fn lookup(&self, url: &Url) -> Option<CachedResponse> {
        let key = canonical_cache_key(url);
        match self.store.lookup(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Schedule a write-back of `response` under the request URL's canonical key.
    ///
    /// Returns whether a write was scheduled; `false` means the response's
    /// Cache-Control withheld storage.
    pub fn store(&self, url: &Url, response: CachedResponse) -> bool {
        let cache_control = response
            .headers
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok());
        if !is_storable(cache_control) {
            debug!(status = response.status.as_u16(), "Response not cacheable");
            return false;
        }

        let key = canonical_cache_key(url);
        let store = Arc::clone(&self.store);
        self.spawner.spawn(
            async move {
                if let Err(e) = store.store(&key, response).await {
                    warn!(error = %e, "Cache write-back failed");
                }
            }
            .boxed(),
        );
        true
    }
}
