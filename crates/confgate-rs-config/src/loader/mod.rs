//! Config source loading.
//!
//! The build pipeline only sees the `SourceLoader` trait; the default
//! `FileSourceLoader` reads JSON, JSON5, YAML, and TOML files relative to a
//! root directory and keeps mapping keys in file order.

mod format;
mod utils;


pub use format::Format;

use crate::LoadError;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

/// Supplies parsed config trees for source references.
pub trait SourceLoader: Send + Sync {
    /// Load and parse the source identified by `path`.
    fn load(&self, path: &Path) -> Result<Value, LoadError>;
}

/// Loads config files from disk, resolving relative paths against a root.
#[derive(Debug, Clone)]
pub struct FileSourceLoader {
    root: PathBuf,
}

impl FileSourceLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parse in-memory contents in the given format.
    pub fn load_str(format: Format, contents: &str) -> Result<Value, LoadError> {
        debug!(
            "loading {format} source from raw contents (len={})",
            contents.len()
        );
        format.parse(contents, Path::new("<inline>"))
    }
}

impl SourceLoader for FileSourceLoader {
    fn load(&self, path: &Path) -> Result<Value, LoadError> {
        let resolved = utils::resolve_path(&self.root, path);
        let contents = match fs::read_to_string(&resolved) {
            Ok(contents) => contents,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                return Err(LoadError::NotFound { path: resolved });
            }
            Err(source) => {
                return Err(LoadError::ReadFailed {
                    path: resolved,
                    source,
                });
            }
        };
        let format = Format::from_path(&resolved).ok_or_else(|| LoadError::UnsupportedFormat {
            path: resolved.clone(),
        })?;
        debug!(
            "loading {format} source (path={})",
            utils::display_path(&resolved).display()
        );
        format.parse(&contents, &resolved)
    }
}
