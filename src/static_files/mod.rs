//! Static file serving for paths outside the proxy prefix.
//!
//! # Responsibilities
//! - Map `/` (and directory paths) to the default document
//! - Resolve request paths under the document root
//! - Pick a content type from the file extension
//!
//! # Design Decisions
//! - Traversal is rejected twice: lexically (`..`, absolute components) and
//!   after canonicalization (symlinks escaping the root)
//! - Escapes answer 404, indistinguishable from a missing file
//! - Files are read whole; this is a development convenience, not a CDN

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::StaticFilesConfig;
use crate::error::ProxyError;

/// Serve `request_path` from the configured document root.
pub async fn serve(
    config: &StaticFilesConfig,
    request_path: &str,
    head_only: bool,
) -> Result<Response, ProxyError> {
    let not_found = || ProxyError::NotFound(request_path.to_string());

    let candidate = resolve(&config.document_root, &config.default_document, request_path)
        .ok_or_else(not_found)?;

    let root = match tokio::fs::canonicalize(&config.document_root).await {
        Ok(root) => root,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(root = %config.document_root.display(), "Document root does not exist");
            return Err(not_found());
        }
        Err(e) => return Err(e.into()),
    };
    let file = match tokio::fs::canonicalize(&candidate).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    if !file.starts_with(&root) {
        tracing::warn!(path = %request_path, "Rejected static path escaping the document root");
        return Err(not_found());
    }

    let contents = match tokio::fs::read(&file).await {
        Ok(contents) => contents,
        // Directories without a trailing slash land here.
        Err(e) if e.kind() == ErrorKind::NotFound || file.is_dir() => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    let content_type = content_type_for(&file);
    tracing::debug!(path = %request_path, file = %file.display(), bytes = contents.len(), "Serving static file");

    let body = if head_only { Body::empty() } else { Body::from(contents) };
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response())
}

/// Lexically map a request path to a file under `root`.
///
/// Returns `None` for paths that are not valid percent-encoded UTF-8 or
/// that contain a NUL, `..` or absolute components after decoding.
pub fn resolve(root: &Path, default_document: &str, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    if decoded.contains('\0') {
        return None;
    }
    let relative = decoded.trim_start_matches('/');

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if relative.is_empty() || relative.ends_with('/') {
        resolved.push(default_document);
    }

    Some(resolved)
}

/// Content type by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        _ => "text/plain",
    }
}
