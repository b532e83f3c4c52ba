//! Origin canonicalization for loader requests.

use routeloader_core::has_dot_segments;
use routeloader_core::path::LOADER_PREFIX;

/// Error type for origin canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("loader path does not resolve under /_expo/loaders: {0}")]
    OutsideLoaderPrefix(String),
}

/// Canonicalize the origin that loader paths are resolved against.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to http:// if missing (loaders usually come from a dev server)
/// 3. Lowercase the host
/// 4. Drop path, query and fragment; loader paths are absolute
pub fn canonicalize_origin(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("http://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    let host = parsed
        .host_str()
        .map(str::to_lowercase)
        .ok_or_else(|| UrlError::MissingHost(trimmed.to_string()))?;
    parsed
        .set_host(Some(&host))
        .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    parsed.set_path("/");
    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve a loader path (which may carry a query) against an origin.
///
/// The resolved URL must still address the loader path itself: dot segments
/// and anything that resolves outside [`LOADER_PREFIX`] are rejected.
pub fn loader_url(origin: &url::Url, loader_path: &str) -> Result<url::Url, UrlError> {
    if has_dot_segments(loader_path) {
        return Err(UrlError::OutsideLoaderPrefix(loader_path.to_string()));
    }

    let url = origin.join(loader_path).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    let path = url.path();
    let under_prefix = path
        .strip_prefix(LOADER_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
    if !under_prefix || url.host_str() != origin.host_str() {
        return Err(UrlError::OutsideLoaderPrefix(loader_path.to_string()));
    }

    Ok(url)
}
