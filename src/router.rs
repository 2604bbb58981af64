//! Route parser for kiscope
//!
//! Two screens exist: the character list and a character detail page.
//!
//! ## Supported Routes
//!
//! - `/` - Character list
//! - `/character/<id>` - Character detail
//!
//! ## Robust Parsing
//!
//! - Scheme form: `kiscope://character/5` (case-insensitive, any number of slashes)
//! - Web hash form: `#/character/5`
//! - Query and fragment stripping: `/character/5?from=share#top`
//!
//! ## Example
//!
//! ```rust
//! use kiscope::router::{parse, Route};
//!
//! assert_eq!(parse("/character/1"), Some(Route::Character { id: 1 }));
//! assert_eq!(parse("/"), Some(Route::List));
//! ```

use crate::types::CharacterId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/character/<id>`
    Character { id: CharacterId },
}

impl Route {
    /// Canonical path form, e.g. `/character/5`.
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Character { id } => format!("/character/{id}"),
        }
    }
}

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Extract path after kiscope:// scheme (case-insensitive, handles variants)
#[inline]
fn after_scheme(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once(':')?;
    if scheme.eq_ignore_ascii_case("kiscope") {
        Some(rest.trim_start_matches('/'))
    } else {
        None
    }
}

/// Parse a route from various URL formats
///
/// Returns `None` for unknown paths or non-numeric ids.
pub fn parse(raw: &str) -> Option<Route> {
    let s = raw.trim();

    let path = if let Some(rest) = after_scheme(s) {
        rest
    } else if let Some(rest) = s.strip_prefix("#/") {
        rest
    } else {
        s.trim_start_matches('/')
    };

    let path = strip_query_frag(path).trim_end_matches('/');
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

    match parts.as_slice() {
        [] => Some(Route::List),
        ["character", id] => id.parse().ok().map(|id| Route::Character { id }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse("/"), Some(Route::List));
        assert_eq!(parse(""), Some(Route::List));
        assert_eq!(parse("kiscope://"), Some(Route::List));
        assert_eq!(parse("#/"), Some(Route::List));
    }

    #[test]
    fn test_parse_character() {
        assert_eq!(parse("/character/1"), Some(Route::Character { id: 1 }));
        assert_eq!(parse("character/22/"), Some(Route::Character { id: 22 }));
        assert_eq!(parse("KISCOPE://character/3"), Some(Route::Character { id: 3 }));
        assert_eq!(parse("kiscope:////character/4"), Some(Route::Character { id: 4 }));
        assert_eq!(parse("#/character/5"), Some(Route::Character { id: 5 }));
        assert_eq!(
            parse("/character/6?from=share#top"),
            Some(Route::Character { id: 6 })
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse("/character/goku").is_none());
        assert!(parse("/character/-1").is_none());
        assert!(parse("/character").is_none());
        assert!(parse("/planets/1").is_none());
        assert!(parse("dbz://character/1").is_none());
    }

    #[test]
    fn test_path_roundtrip() {
        let r = Route::Character { id: 9 };
        assert_eq!(parse(&r.path()), Some(r));
        assert_eq!(Route::List.path(), "/");
    }
}
