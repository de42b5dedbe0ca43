//! Upstream URL construction.
//!
//! Pure string functions, no I/O, so the mapping from inbound path to
//! upstream URL can be checked without a network.

/// Map an inbound path onto the upstream base.
///
/// Returns `None` when `inbound_path` is outside `prefix`. Nothing is
/// stripped: the full inbound path is appended to `upstream_base`, so
/// `/api/notion/pages` against `http://localhost:3000` becomes
/// `http://localhost:3000/api/notion/pages`.
pub fn rewrite(inbound_path: &str, prefix: &str, upstream_base: &str) -> Option<String> {
    if !inbound_path.starts_with(prefix) {
        return None;
    }
    Some(format!("{}{}", upstream_base.trim_end_matches('/'), inbound_path))
}

/// Like [`rewrite`], but drops the prefix first.
///
/// Used when the upstream exposes the API at its root, e.g. forwarding
/// `/api/notion/pages` to `https://api.notion.com/v1/pages`.
pub fn strip_rewrite(inbound_path: &str, prefix: &str, upstream_base: &str) -> Option<String> {
    let rest = inbound_path.strip_prefix(prefix)?;
    let rest = rest.trim_start_matches('/');
    Some(format!("{}/{}", upstream_base.trim_end_matches('/'), rest))
}

/// Append the raw inbound query string, untouched, so parameter order
/// and encoding survive the hop.
pub fn with_query(url: String, raw_query: Option<&str>) -> String {
    match raw_query {
        Some(query) if !query.is_empty() => format!("{}?{}", url, query),
        _ => url,
    }
}
