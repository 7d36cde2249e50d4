//! # pixedge core
//!
//! Pure request logic for the pixedge image proxy. Nothing in this crate
//! performs I/O, so every function here can be tested directly.
//!
//! This crate provides:
//! - **Key validation**: [`ContentKey`] extracted from a request path
//! - **Content sniffing**: true image type from magic bytes
//! - **Cache keys**: query-order independent canonical cache keys
//! - **Cache policy**: `Cache-Control` storability rules
//!
//! ## Example
//!
//! ```rust
//! use pixedge_core::{ContentKey, ImageType, sniff, IMAGES_PREFIX};
//!
//! let key = ContentKey::from_path("/images/a/b.png", IMAGES_PREFIX).unwrap();
//! assert_eq!(key.as_str(), "a/b.png");
//!
//! let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
//! assert_eq!(sniff(&png).unwrap(), ImageType::Png);
//! ```

pub mod cache_key;
pub mod cache_policy;
pub mod error;
pub mod key;
pub mod sniff;

pub use cache_key::canonical_cache_key;
pub use cache_policy::is_storable;
pub use error::{CoreError, KeyError, Result};
pub use key::ContentKey;
pub use sniff::{sniff, ImageType};

/// Mount prefix of the image routes
pub const IMAGES_PREFIX: &str = "/images/";

/// Default upload ceiling (10 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Default upper bound on an origin fetch, in seconds
pub const DEFAULT_ORIGIN_TIMEOUT_SECS: u64 = 30;

/// Response header carrying `HIT` or `MISS`
pub const CACHE_STATUS_HEADER: &str = "x-cache-status";
