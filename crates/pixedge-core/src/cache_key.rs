//! Canonical cache keys
//!
//! Two URLs that differ only in the order of their query parameters map to
//! the same key. Parameters are stably sorted by their decoded name with
//! plain byte-wise comparison, so repeated names keep their relative order.
//! Each `name=value` piece is kept exactly as received: the origin sees the
//! raw query, so two queries that decode alike but differ on the wire must
//! not share an entry.

use std::borrow::Cow;
use url::Url;

/// Build the canonical cache key for a request URL
pub fn canonical_cache_key(url: &Url) -> String {
    let mut pieces: Vec<(Vec<u8>, &str)> = url
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| (decoded_name(piece), piece))
        .collect();

    let mut canonical = url.clone();
    canonical.set_fragment(None);

    if pieces.is_empty() {
        canonical.set_query(None);
        return canonical.into();
    }

    // Vec::sort_by is stable
    pieces.sort_by(|a, b| a.0.cmp(&b.0));
    let query = pieces
        .iter()
        .map(|(_, piece)| *piece)
        .collect::<Vec<_>>()
        .join("&");
    canonical.set_query(Some(&query));
    canonical.into()
}

/// Form-decoded bytes of the name part of a `name=value` piece
fn decoded_name(piece: &str) -> Vec<u8> {
    let name = piece.split('=').next().unwrap_or(piece);
    let name: Cow<str> = if name.contains('+') {
        Cow::Owned(name.replace('+', " "))
    } else {
        Cow::Borrowed(name)
    };
    urlencoding::decode_binary(name.as_bytes()).into_owned()
}
