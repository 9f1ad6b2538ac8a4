//! Request-path and filesystem-path helpers.
//!
//! Request paths are URL paths: they always start with `/`, never end with
//! `/` (except the root itself) and never contain empty segments.

use std::io;
use std::path::{Path, PathBuf};

/// Request path of the sketches root.
pub const ROOT_REQUEST_PATH: &str = "/";

/// Normalize a request path: enforce a leading `/`, drop empty segments and
/// trailing slashes. The empty string normalizes to `/`.
pub fn normalize_request_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Join a segment onto a request path.
pub fn join_request_path(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    format!("{}/{}", base, segment.trim_matches('/'))
}

/// Parent request path, or `None` for the root.
pub fn parent_request_path(path: &str) -> Option<String> {
    let normalized = normalize_request_path(path);
    if normalized == ROOT_REQUEST_PATH {
        return None;
    }
    match normalized.rfind('/') {
        Some(0) => Some(ROOT_REQUEST_PATH.to_string()),
        Some(idx) => Some(normalized[..idx].to_string()),
        None => None,
    }
}

/// Final segment of a request path (empty for the root).
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// A request targets a file when its final segment contains a `.`.
pub fn is_file_request(path: &str) -> bool {
    last_segment(path.trim_end_matches('/')).contains('.')
}

/// Every strict prefix of a request path, shortest first, starting at `/`.
///
/// `/a/b/c.png` yields `/`, `/a`, `/a/b`.
pub fn request_prefixes(path: &str) -> Vec<String> {
    let normalized = normalize_request_path(path);
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    let mut prefixes = Vec::with_capacity(segments.len());
    prefixes.push(ROOT_REQUEST_PATH.to_string());
    let mut current = String::new();
    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        current.push('/');
        current.push_str(segment);
        prefixes.push(current.clone());
    }
    prefixes
}

/// Path of `request` relative to `prefix`, without a leading `/`.
///
/// Returns `None` when `request` does not live under `prefix`.
pub fn strip_request_prefix(request: &str, prefix: &str) -> Option<String> {
    let request = normalize_request_path(request);
    let prefix = normalize_request_path(prefix);
    if prefix == ROOT_REQUEST_PATH {
        return Some(request.trim_start_matches('/').to_string());
    }
    let rest = request.strip_prefix(&prefix)?;
    if rest.is_empty() {
        return Some(String::new());
    }
    rest.strip_prefix('/').map(str::to_string)
}

/// Bracket-named directories (`[name]`) are pass-through containers.
pub fn is_pass_through_dir(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('[') && name.ends_with(']')
}

/// Base name without its final extension. Dotfiles keep their full name.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Final extension of a base name, if any.
pub fn file_extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(idx) if idx > 0 => Some(&name[idx + 1..]),
        _ => None,
    }
}

/// Resolve the sketches root against the working directory and canonicalize
/// it when it exists.
pub fn resolve_root(root: &Path) -> io::Result<PathBuf> {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    match dunce::canonicalize(&absolute) {
        Ok(canonical) => Ok(canonical),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(absolute),
        Err(e) => Err(e),
    }
}
