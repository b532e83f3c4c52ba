//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-loaders server.

pub mod cache;
pub mod loader_data;

use routeloader_core::{Error, has_dot_segments};

/// Reject inputs that are not app route paths.
///
/// Loaders are always resolved against the configured origin, so absolute
/// URLs are refused rather than silently rewritten.
pub(crate) fn check_route(route: &str) -> Result<(), Error> {
    if route.contains("://") || route.starts_with("//") {
        return Err(Error::InvalidInput(format!("route must be a path, not a URL: {route}")));
    }
    if route.chars().any(char::is_whitespace) {
        return Err(Error::InvalidInput(format!("route cannot contain whitespace: {route:?}")));
    }
    if has_dot_segments(route) {
        return Err(Error::InvalidInput(format!("route cannot contain '.' or '..' segments: {route}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_route() {
        assert!(check_route("/posts/1").is_ok());
        assert!(check_route("").is_ok());
        assert!(check_route("posts?q=a").is_ok());
        assert!(matches!(check_route("https://example.com/posts"), Err(Error::InvalidInput(_))));
        assert!(matches!(check_route("//example.com/posts"), Err(Error::InvalidInput(_))));
        assert!(matches!(check_route("/posts 1"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_check_route_rejects_dot_segments() {
        for route in ["/../../admin/secrets", "/a/../b", "./a", "/a/%2e%2e/b"] {
            assert!(matches!(check_route(route), Err(Error::InvalidInput(_))), "{route}");
        }
        assert!(check_route("/files/report.v2.json").is_ok());
    }
}
