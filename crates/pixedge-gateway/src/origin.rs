//! Transform origin client
//!
//! Every outbound URL is re-derived and its origin (scheme, host, port)
//! compared byte-for-byte with the configured one before dispatch, so no
//! key or query content can send a request anywhere else. Redirects are
//! not followed for the same reason.

use crate::config::{parse_http_url, GatewayConfig};
use crate::error::{ApiError, ErrorCode};
use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, StatusCode};
use pixedge_core::ContentKey;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Fixed route of the transform service under the origin
pub const TRANSFORM_ROUTE: &str = "/transform/";

/// Headers that describe a single hop and are never relayed
static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Response received from the origin
#[derive(Clone, Debug)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Client for the backend transform origin
#[derive(Clone)]
pub struct OriginGateway {
    client: Client,
    base: Url,
    origin: String,
    timeout: Duration,
}

impl OriginGateway {
    /// Create a gateway for `origin_url` with an upper bound on each fetch
    pub fn new(origin_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base = parse_http_url("origin_url", origin_url)?;
        base.set_query(None);
        base.set_fragment(None);
        let origin = base.origin().ascii_serialization();

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base,
            origin,
            timeout,
        })
    }

    /// Create a gateway from the gateway configuration
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        Self::new(&config.origin_url, config.origin_timeout())
    }

    /// The configured origin, serialized as `scheme://host[:port]`
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Build the outbound URL for a key and the caller's raw query string
    pub fn build_url(&self, key: &ContentKey, query: Option<&str>) -> Result<Url, ApiError> {
        let encoded: Vec<String> = key
            .segments()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        let mut raw = format!(
            "{}{}{}",
            self.base.as_str().trim_end_matches('/'),
            TRANSFORM_ROUTE,
            encoded.join("/")
        );
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            raw.push('?');
            raw.push_str(query);
        }

        let url = Url::parse(&raw)
            .map_err(|e| ApiError::new(ErrorCode::OriginMismatch, format!("outbound URL did not parse: {}", e)))?;
        self.check_origin(&url)?;
        Ok(url)
    }

    /// Reject any URL whose origin differs from the configured one
    pub fn check_origin(&self, url: &Url) -> Result<(), ApiError> {
        let actual = url.origin().ascii_serialization();
        if actual.as_bytes() != self.origin.as_bytes() {
            warn!(expected = %self.origin, actual = %actual, "Blocked outbound request to foreign origin");
            return Err(ApiError::new(
                ErrorCode::OriginMismatch,
                format!("outbound origin {} does not match configured origin", actual),
            ));
        }
        Ok(())
    }

    /// Fetch a key from the origin.
    ///
    /// The whole exchange, body included, is bounded by the configured
    /// timeout. Expiry maps to 504; every other transport failure to 502.
    /// Non-2xx origin statuses are returned, not treated as errors.
    #[instrument(skip_all)]
    pub async fn fetch(&self, key: &ContentKey, query: Option<&str>) -> Result<OriginResponse, ApiError> {
        let url = self.build_url(key, query)?;
        debug!(path = %url.path(), "Forwarding to origin");

        let exchange = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            let headers = relay_headers(response.headers());
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(OriginResponse { status, headers, body })
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(response)) => {
                debug!(status = response.status.as_u16(), size = response.body.len(), "Origin responded");
                Ok(response)
            }
            Ok(Err(e)) if e.is_timeout() => Err(ApiError::new(ErrorCode::GatewayTimeout, e.without_url().to_string())),
            Ok(Err(e)) => Err(ApiError::new(ErrorCode::BadGateway, e.without_url().to_string())),
            Err(_) => Err(ApiError::new(
                ErrorCode::GatewayTimeout,
                format!("origin did not respond within {:?}", self.timeout),
            )),
        }
    }
}

/// Copy origin headers, dropping hop-by-hop headers and the length of a
/// body that will be re-framed
fn relay_headers(headers: &HeaderMap) -> HeaderMap {
    let mut relayed = headers.clone();
    for name in HOP_BY_HOP.iter() {
        relayed.remove(name);
    }
    relayed.remove(header::CONTENT_LENGTH);
    relayed
}
