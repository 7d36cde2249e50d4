//! Error types for the pixedge-core crate

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Why a content key was rejected.
///
/// Neither variant carries the offending input so it can never be
/// reflected back to a caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyError {
    /// The path carried no key after the mount prefix
    #[error("no image key in request path")]
    Missing,

    /// The key breaks one of the content key rules
    #[error("image key failed validation")]
    Invalid,
}

/// Errors produced by core request logic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Key missing or malformed
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Buffer matches no known image signature
    #[error("unsupported media type")]
    UnsupportedMediaType,
}
