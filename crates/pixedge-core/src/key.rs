//! Content key extraction and validation

use crate::error::KeyError;
use serde::Serialize;
use std::fmt;

/// A validated identifier for an image resource.
///
/// A key is non-empty, contains only `[a-zA-Z0-9-_/.]`, has no `..`,
/// does not start with `/` and never contains `//`. A segment made of a
/// single `.` is rejected too, since URL parsing would drop it on the way
/// to the origin.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentKey(String);

impl ContentKey {
    /// Strip `prefix` from a request path and validate what remains.
    ///
    /// A path that does not carry the prefix, or carries nothing after it,
    /// yields [`KeyError::Missing`].
    pub fn from_path(path: &str, prefix: &str) -> Result<Self, KeyError> {
        let candidate = path.strip_prefix(prefix).ok_or(KeyError::Missing)?;
        if candidate.is_empty() {
            return Err(KeyError::Missing);
        }
        Self::parse(candidate)
    }

    /// Validate an already-extracted key
    pub fn parse(candidate: &str) -> Result<Self, KeyError> {
        if candidate.is_empty() {
            return Err(KeyError::Missing);
        }
        if !candidate.bytes().all(is_key_byte)
            || candidate.contains("..")
            || candidate.starts_with('/')
            || candidate.contains("//")
            || candidate.split('/').any(|segment| segment == ".")
        {
            return Err(KeyError::Invalid);
        }
        Ok(Self(candidate.to_string()))
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments of the key
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'/' | b'.')
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
