//! Path helpers shared by every disk
//!
//! Paths are plain `/`-separated strings relative to a disk's root. These
//! helpers never normalise `.` or `..`; a path is stored exactly as given.

/// Separator used by every disk for logical paths and object keys.
pub const DELIMITER: char = '/';

/// Join a root and a path. An empty side yields the other side unchanged.
pub fn join(root: &str, path: &str) -> String {
    if root.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return root.to_string();
    }
    if root.ends_with(DELIMITER) {
        format!("{root}{path}")
    } else {
        format!("{root}{DELIMITER}{path}")
    }
}

/// Split a path on its last separator into `(directory, name)`.
pub fn split(path: &str) -> (&str, &str) {
    path.rsplit_once(DELIMITER).unwrap_or(("", path))
}

/// Directory part of a path, empty for top-level names.
pub fn parent(path: &str) -> &str {
    split(path).0
}

/// First segment of a path, e.g. `a` for `a/b/c`.
pub fn first_segment(path: &str) -> &str {
    path.split(DELIMITER).next().unwrap_or("")
}
