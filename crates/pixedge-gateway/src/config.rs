//! Gateway configuration

use pixedge_core::{DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_ORIGIN_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Gateway server configuration.
///
/// Built once at startup and shared read-only with every request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the transform origin
    pub origin_url: String,
    /// Public base URL used to build cache keys
    pub public_url: String,
    /// Upload ceiling (bytes)
    pub max_upload_size: u64,
    /// Upper bound on an origin fetch (seconds)
    pub origin_timeout_secs: u64,
    /// Maximum number of responses held by the memory cache
    pub cache_capacity: usize,
    /// Directory for the filesystem object store; in-memory when unset
    pub object_store_dir: Option<PathBuf>,
    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            origin_url: "http://localhost:8080".to_string(),
            public_url: "http://localhost".to_string(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            origin_timeout_secs: DEFAULT_ORIGIN_TIMEOUT_SECS,
            cache_capacity: 1024,
            object_store_dir: None,
            cors_enabled: true,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origin fetch timeout
    pub fn origin_timeout(&self) -> Duration {
        Duration::from_secs(self.origin_timeout_secs)
    }

    /// Check the configuration before the server starts
    pub fn validate(&self) -> anyhow::Result<()> {
        parse_http_url("origin_url", &self.origin_url)?;
        parse_http_url("public_url", &self.public_url)?;
        if self.max_upload_size == 0 {
            anyhow::bail!("max_upload_size must be greater than zero");
        }
        if self.origin_timeout_secs == 0 {
            anyhow::bail!("origin_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Parse a configured base URL, requiring an http(s) scheme and a host
pub(crate) fn parse_http_url(name: &str, value: &str) -> anyhow::Result<Url> {
    let url = Url::parse(value).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("{} must use http or https", name);
    }
    if url.host_str().is_none() {
        anyhow::bail!("{} must include a host", name);
    }
    Ok(url)
}
