//! Image upload pipeline

use crate::error::ErrorCode;
use crate::{AppState, ApiError};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use pixedge_core::{sniff, ContentKey, IMAGES_PREFIX};
use pixedge_store::ObjectMetadata;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Body of a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub key: ContentKey,
}

/// PUT /images/{key} - Store an uploaded image.
///
/// The stored content type always comes from the sniffed signature; a
/// client-declared `Content-Type` is ignored.
pub async fn put_image(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    let key = ContentKey::from_path(uri.path(), IMAGES_PREFIX)?;
    let limit = state.config.max_upload_size;

    if let Some(declared) = declared_length(&headers) {
        if declared > limit {
            return Err(too_large(declared, limit));
        }
    }

    let data = read_body(body, limit).await?;
    if data.len() as u64 > limit {
        return Err(too_large(data.len() as u64, limit));
    }

    let image_type = sniff(&data)?;
    let metadata = ObjectMetadata::new(image_type.mime_type(), data.len() as u64);
    let size = data.len();

    state.object_store.put(key.as_str(), data, metadata).await?;

    info!(content_type = image_type.mime_type(), size, "Stored upload");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse { success: true, key }),
    )
        .into_response())
}

/// Size declared by the client, if any
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Collect the body, giving up as soon as it grows past `limit`
async fn read_body(body: Body, limit: u64) -> Result<Bytes, ApiError> {
    let mut stream = body.into_data_stream();
    let mut buf = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ApiError::new(ErrorCode::InternalError, format!("failed to read body: {}", e)))?;
        let total = (buf.len() + chunk.len()) as u64;
        if total > limit {
            return Err(too_large(total, limit));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}

fn too_large(size: u64, limit: u64) -> ApiError {
    ApiError::new(
        ErrorCode::PayloadTooLarge,
        format!("upload of at least {} bytes exceeds limit of {} bytes", size, limit),
    )
}
