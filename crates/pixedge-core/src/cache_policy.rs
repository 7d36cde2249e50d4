//! Cache-Control storability rules

/// Whether a response carrying this `Cache-Control` value may be stored.
///
/// A missing header is never stored. Directives are matched
/// case-insensitively; `no-store`, `private` and `max-age=0` (with any
/// whitespace around `=`) withhold storage.
pub fn is_storable(cache_control: Option<&str>) -> bool {
    let Some(value) = cache_control else {
        return false;
    };

    !value.split(',').any(|directive| {
        let (name, arg) = match directive.split_once('=') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (directive.trim(), None),
        };

        if name.eq_ignore_ascii_case("no-store") || name.eq_ignore_ascii_case("private") {
            return true;
        }

        name.eq_ignore_ascii_case("max-age")
            && arg
                .map(|a| a.trim_matches('"'))
                .and_then(|a| a.parse::<u64>().ok())
                == Some(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_not_storable() {
        assert!(!is_storable(None));
    }

    #[test]
    fn test_public_max_age_storable() {
        assert!(is_storable(Some("public, max-age=31536000, immutable")));
        assert!(is_storable(Some("max-age=60")));
        assert!(is_storable(Some("s-maxage=0, max-age=10")));
    }

    #[test]
    fn test_no_store_and_private() {
        assert!(!is_storable(Some("no-store")));
        assert!(!is_storable(Some("public, NO-STORE")));
        assert!(!is_storable(Some("Private, max-age=600")));
        assert!(!is_storable(Some("private=\"set-cookie\"")));
    }

    #[test]
    fn test_zero_max_age() {
        assert!(!is_storable(Some("max-age=0")));
        assert!(!is_storable(Some("public, max-age = 0")));
        assert!(!is_storable(Some("MAX-AGE\t=\t0, must-revalidate")));
        assert!(!is_storable(Some("max-age=\"0\"")));
    }

    #[test]
    fn test_directive_names_matched_whole() {
        // Only the directive name counts, not substrings of other tokens
        assert!(is_storable(Some("public, x-no-store-hint=1")));
        assert!(is_storable(Some("max-age=100")));
    }
}
