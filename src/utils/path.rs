//! ## path
//!
//! Share path utilities.
//!
//! Paths are joined by plain string concatenation: segments such as `..` are
//! kept verbatim and left to the server to interpret.

/// Build the base uri of a share
pub fn base_uri(server: &str, share: &str) -> String {
    format!("smb://{server}/{share}/")
}

/// Resolve `relative` against `base`, which must end with a separator.
///
/// Leading separators of `relative` are ignored. An empty relative path resolves
/// to `base` itself; any other path gets a single trailing separator.
pub fn resolve(base: &str, relative: &str) -> String {
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        base.to_string()
    } else {
        format!("{base}{relative}/")
    }
}

/// Convert `uri` to a path relative to the share root, as used by sessions (e.g. `/a/b.jpg`).
///
/// `uri` may be either a fully qualified uri under `base`, or a path relative to the share root.
/// Returns `None` if `uri` is a fully qualified uri pointing outside of `base`.
pub fn share_path(base: &str, uri: &str) -> Option<String> {
    let rest = if let Some(rest) = uri.strip_prefix(base) {
        rest
    } else if uri == base.trim_end_matches('/') {
        ""
    } else if uri.starts_with("smb://") {
        return None;
    } else {
        uri.trim_start_matches('/')
    };
    Some(format!("/{rest}"))
}

/// Join `name` to `parent`
pub fn join(parent: &str, name: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), name)
}

/// Get every ancestor of `path` (share path) and the path itself, from the outermost.
///
/// `/a/b/c/` yields `/a`, `/a/b`, `/a/b/c`. Empty segments are skipped.
pub fn ancestors(path: &str) -> Vec<String> {
    let mut current = String::new();
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            current.push('/');
            current.push_str(segment);
            current.clone()
        })
        .collect()
}

/// Tell whether `name` can be used as the name of a new folder:
/// not blank and without separators
pub fn is_valid_folder_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains('/') && !name.contains('\\')
}
