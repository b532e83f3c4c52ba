//! Route path to loader-module path normalization.
//!
//! Every route `/a/b` has its loader data served from `/_expo/loaders/a/b`.
//! The loader path doubles as the cache key, so equivalent routes must map to
//! byte-identical strings:
//!
//! - `/posts/1` and `/posts/1/` map to `/_expo/loaders/posts/1`
//! - `/` and the empty path map to `/_expo/loaders/index`
//! - the query string is carried over unchanged, fragments are dropped

/// Path prefix under which loader modules are served.
pub const LOADER_PREFIX: &str = "/_expo/loaders";

/// Segment used for the root route.
const INDEX_SEGMENT: &str = "/index";

/// Split a path at the first `?`, returning the path and the raw query (without `?`).
pub fn split_query(input: &str) -> (&str, Option<&str>) {
    match input.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (input, None),
    }
}

/// Normalize the path component of a route.
///
/// Strips exactly one trailing slash, adds a missing leading slash, and maps
/// the root to the index segment.
pub fn normalize_route_path(path: &str) -> String {
    let stripped = if path == "/" { path } else { path.strip_suffix('/').unwrap_or(path) };

    match stripped {
        "" | "/" => INDEX_SEGMENT.to_string(),
        p if p.starts_with('/') => p.to_string(),
        p => format!("/{p}"),
    }
}

/// Whether the path part of a route holds `.` or `..` segments.
///
/// URL resolution collapses these (including `%2e` spellings and `\`
/// separators), which would make the request target differ from the cache key.
pub fn has_dot_segments(route_path: &str) -> bool {
    let without_fragment = route_path.split_once('#').map_or(route_path, |(path, _)| path);
    let (path, _) = split_query(without_fragment);
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Map a route pathname (with optional query) to its loader-module path.
pub fn loader_module_path(route_path: &str) -> String {
    let without_fragment = route_path.split_once('#').map_or(route_path, |(path, _)| path);
    let (path, query) = split_query(without_fragment);
    let normalized = normalize_route_path(path);

    let mut out = String::with_capacity(LOADER_PREFIX.len() + normalized.len() + query.map_or(0, |q| q.len() + 1));
    out.push_str(LOADER_PREFIX);
    out.push_str(&normalized);
    if let Some(query) = query {
        out.push('?');
        out.push_str(query);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_maps_to_index() {
        assert_eq!(loader_module_path("/"), "/_expo/loaders/index");
        assert_eq!(loader_module_path(""), "/_expo/loaders/index");
    }

    #[test]
    fn test_simple_route() {
        assert_eq!(loader_module_path("/about"), "/_expo/loaders/about");
    }

    #[test]
    fn test_trailing_slash_equivalence() {
        assert_eq!(loader_module_path("/posts/1"), loader_module_path("/posts/1/"));
        assert_eq!(loader_module_path("/posts/1/"), "/_expo/loaders/posts/1");
    }

    #[test]
    fn test_only_one_trailing_slash_stripped() {
        assert_eq!(loader_module_path("/posts/1//"), "/_expo/loaders/posts/1/");
        assert_eq!(loader_module_path("//"), "/_expo/loaders/index");
    }

    #[test]
    fn test_query_preserved() {
        assert_eq!(loader_module_path("/posts/1?x=2"), "/_expo/loaders/posts/1?x=2");
        assert_eq!(loader_module_path("/posts/1/?x=2&y=a%20b"), "/_expo/loaders/posts/1?x=2&y=a%20b");
        assert_eq!(loader_module_path("/?tab=home"), "/_expo/loaders/index?tab=home");
        assert_eq!(loader_module_path("?q"), "/_expo/loaders/index?q");
    }

    #[test]
    fn test_fragment_dropped() {
        assert_eq!(loader_module_path("/docs#intro"), "/_expo/loaders/docs");
        assert_eq!(loader_module_path("/docs?v=1#intro"), "/_expo/loaders/docs?v=1");
    }

    #[test]
    fn test_missing_leading_slash() {
        assert_eq!(loader_module_path("about"), "/_expo/loaders/about");
        assert_eq!(loader_module_path("about/"), "/_expo/loaders/about");
    }

    #[test]
    fn test_deterministic() {
        let a = loader_module_path("/posts/[id]?x=2");
        let b = loader_module_path("/posts/[id]?x=2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_dot_segments_detected() {
        assert!(has_dot_segments("/../../admin/secrets"));
        assert!(has_dot_segments("/a/./b"));
        assert!(has_dot_segments("/a/%2E%2e/b"));
        assert!(has_dot_segments("/a\\..\\b"));
        assert!(has_dot_segments(".."));
        assert!(!has_dot_segments("/posts/1.json"));
        assert!(!has_dot_segments("/a/...b"));
        assert!(!has_dot_segments("/search?path=../x"));
        assert!(!has_dot_segments("/docs#../x"));
    }

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("/a?b=1?c"), ("/a", Some("b=1?c")));
        assert_eq!(split_query("/a"), ("/a", None));
        assert_eq!(split_query("/a?"), ("/a", Some("")));
    }

    #[test]
    fn test_normalize_route_path() {
        assert_eq!(normalize_route_path("/"), "/index");
        assert_eq!(normalize_route_path("/a/"), "/a");
        assert_eq!(normalize_route_path("a"), "/a");
    }
}
