//! Magic-byte image type detection
//!
//! The detected type is authoritative: a client-declared `Content-Type`
//! is never consulted.

use crate::error::{CoreError, Result};
use std::fmt;

/// Number of leading bytes inspected
pub const SNIFF_LEN: usize = 16;

const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const GIF: &[u8] = b"GIF";
const WEBP: &[u8] = b"WEBP";
const FTYP: &[u8] = b"ftyp";
const AVIF_BRANDS: [&[u8]; 2] = [b"avif", b"avis"];

/// Image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
    Webp,
    Avif,
}

impl ImageType {
    /// MIME type stored alongside the object
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Avif => "image/avif",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Classify a buffer by its leading bytes.
///
/// Signatures whose bytes lie past the end of a short buffer simply do
/// not match.
pub fn sniff(data: &[u8]) -> Result<ImageType> {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if head.starts_with(JPEG) {
        Ok(ImageType::Jpeg)
    } else if head.starts_with(PNG) {
        Ok(ImageType::Png)
    } else if head.starts_with(GIF) {
        Ok(ImageType::Gif)
    } else if head.get(8..12) == Some(WEBP) {
        Ok(ImageType::Webp)
    } else if head.get(4..8) == Some(FTYP)
        && head.get(8..12).is_some_and(|brand| AVIF_BRANDS.contains(&brand))
    {
        Ok(ImageType::Avif)
    } else {
        Err(CoreError::UnsupportedMediaType)
    }
}
