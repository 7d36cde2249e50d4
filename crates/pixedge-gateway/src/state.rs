//! Application state

use crate::background::{TaskSpawner, TokioSpawner};
use crate::cache::CacheAdapter;
use crate::config::{parse_http_url, GatewayConfig};
use crate::origin::OriginGateway;
use axum::http::Uri;
use pixedge_store::{CacheStore, FileObjectStore, MemoryCacheStore, MemoryObjectStore, ObjectStore};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Application state shared across handlers.
///
/// Everything here is read-only after construction.
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Base URL for cache keys
    pub public_base: Url,
    /// Transform origin client
    pub origin: OriginGateway,
    /// Response cache
    pub cache: CacheAdapter,
    /// Upload destination
    pub object_store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Create application state with the stores named by the configuration
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let cache_store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new(config.cache_capacity));
        info!(capacity = config.cache_capacity, "Using in-memory response cache");

        let object_store: Arc<dyn ObjectStore> = match &config.object_store_dir {
            Some(dir) => {
                let store = FileObjectStore::new(dir)?;
                info!(root = %dir.display(), "Using filesystem object store");
                Arc::new(store)
            }
            None => Arc::new(MemoryObjectStore::new()),
        };

        if !object_store.is_persistent() {
            warn!("⚠ Object store: In-memory (NOT persistent - for development only)");
        }

        Self::with_stores(config, cache_store, object_store, Arc::new(TokioSpawner::new()))
    }

    /// Create application state over explicit stores and a background executor
    pub fn with_stores(
        config: GatewayConfig,
        cache_store: Arc<dyn CacheStore>,
        object_store: Arc<dyn ObjectStore>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let public_base = parse_http_url("public_url", &config.public_url)?;
        let origin = OriginGateway::from_config(&config)?;
        let cache = CacheAdapter::new(cache_store, spawner);

        Ok(Self {
            config,
            public_base,
            origin,
            cache,
            object_store,
        })
    }

    /// URL identifying a request in the response cache
    pub fn cache_url(&self, uri: &Uri) -> Url {
        let mut url = self.public_base.clone();
        url.set_path(uri.path());
        url.set_query(uri.query());
        url
    }
}
