//! Helper utilities for loader path handling.

use std::path::{Path, PathBuf};

/// Resolve `path` against `root`; absolute paths are returned unchanged.
pub(super) fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Path shown in load logs: the canonical location of a source that was
/// read, or the resolved path when it cannot be canonicalized.
pub(super) fn display_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
