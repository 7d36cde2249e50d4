//! Image read path: cache, then origin, then background write-back

use crate::{AppState, ApiError};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, Uri},
    response::Response,
};
use bytes::Bytes;
use pixedge_core::{ContentKey, CACHE_STATUS_HEADER, IMAGES_PREFIX};
use pixedge_store::CachedResponse;
use std::sync::Arc;
use tracing::debug;

/// Where a response was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Header value for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// GET /images/{key} - Serve an image from cache or the transform origin
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let key = ContentKey::from_path(uri.path(), IMAGES_PREFIX)?;
    let cache_url = state.cache_url(&uri);

    if let Some(hit) = state.cache.lookup(&cache_url).await {
        debug!(key = %key, "Cache hit");
        return Ok(relay(hit.status, hit.headers, hit.body, CacheStatus::Hit));
    }

    debug!(key = %key, "Cache miss");
    let origin = state.origin.fetch(&key, uri.query()).await?;

    let entry = CachedResponse::new(origin.status, origin.headers.clone(), origin.body.clone());
    let response = relay(origin.status, origin.headers, origin.body, CacheStatus::Miss);

    // No deduplication: concurrent misses for one key each reach the origin
    state.cache.store(&cache_url, entry);

    Ok(response)
}

fn relay(status: StatusCode, headers: HeaderMap, body: Bytes, cache_status: CacheStatus) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response.headers_mut().insert(
        CACHE_STATUS_HEADER,
        HeaderValue::from_static(cache_status.as_str()),
    );
    response
}
