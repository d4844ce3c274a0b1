//! Request-path normalization.

use std::borrow::Cow;

/// Returns the shortest rooted path equivalent to `path`.
///
/// Repeated separators collapse, `.` segments drop, `..` removes the segment
/// before it (never climbing above the root), and a trailing slash is
/// stripped. The result always begins with `/`; an empty result is `/`.
///
/// Already-clean input is returned borrowed.
pub(crate) fn clean(path: &str) -> Cow<'_, str> {
    if is_clean(path) {
        return Cow::Borrowed(path);
    }

    let mut kept: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            s => kept.push(s),
        }
    }

    if kept.is_empty() {
        return Cow::Borrowed("/");
    }

    let mut cleaned = String::with_capacity(path.len());
    for segment in kept {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    Cow::Owned(cleaned)
}

fn is_clean(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    match path.strip_prefix('/') {
        Some(rest) => rest.split('/').all(|s| !matches!(s, "" | "." | "..")),
        None => false,
    }
}
