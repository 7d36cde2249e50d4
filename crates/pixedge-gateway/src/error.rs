//! Error types and public error codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixedge_core::{CoreError, KeyError};
use pixedge_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Error codes exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidKey,
    OriginMismatch,
    NotFound,
    PayloadTooLarge,
    UnsupportedMediaType,
    InternalError,
    BadGateway,
    GatewayTimeout,
}

impl ErrorCode {
    /// Get the error code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidKey => "InvalidKey",
            Self::OriginMismatch => "InvalidRequest",
            Self::NotFound => "NotFound",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::UnsupportedMediaType => "UnsupportedMediaType",
            Self::InternalError => "InternalError",
            Self::BadGateway => "BadGateway",
            Self::GatewayTimeout => "GatewayTimeout",
        }
    }

    /// Fixed message shown to callers. Never carries request data.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidKey => "Invalid image key",
            Self::OriginMismatch => "Invalid request",
            Self::NotFound => "Not found",
            Self::PayloadTooLarge => "Payload too large",
            Self::UnsupportedMediaType => "Unsupported image type",
            Self::InternalError => "Internal server error",
            Self::BadGateway => "Origin unavailable",
            Self::GatewayTimeout => "Origin timed out",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidKey | Self::OriginMismatch => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway => StatusCode::BAD_GATEWAY,
            Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

/// API error type.
///
/// The `Display` text is for logs only; responses carry the fixed
/// [`ErrorCode::public_message`].
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{code:?}: {detail}")]
    Api {
        code: ErrorCode,
        detail: String,
        request_id: String,
    },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Create a new API error with an internal detail for logging
    pub fn new(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Api {
            code,
            detail: detail.into(),
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Get the error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Api { code, .. } => *code,
            Self::Core(e) => match e {
                CoreError::InvalidKey(_) => ErrorCode::InvalidKey,
                CoreError::UnsupportedMediaType => ErrorCode::UnsupportedMediaType,
            },
            Self::Store(_) => ErrorCode::InternalError,
        }
    }
}

impl From<KeyError> for ApiError {
    fn from(err: KeyError) -> Self {
        Self::Core(CoreError::InvalidKey(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = code.status_code();
        let request_id = match &self {
            ApiError::Api { request_id, .. } => request_id.clone(),
            _ => uuid::Uuid::new_v4().to_string(),
        };

        if status.is_server_error() {
            tracing::error!(request_id = %request_id, code = code.as_str(), error = %self, "Request failed");
        } else {
            tracing::debug!(request_id = %request_id, code = code.as_str(), error = %self, "Request rejected");
        }

        let body = json!({
            "success": false,
            "error": {
                "code": code.as_str(),
                "message": code.public_message(),
            },
            "requestId": request_id,
        });

        (status, [("x-request-id", request_id.as_str())], Json(body)).into_response()
    }
}
