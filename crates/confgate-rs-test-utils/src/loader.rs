use confgate_rs_config::{LoadError, SourceLoader};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Serves pre-parsed trees by path and records every load request.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    sources: HashMap<PathBuf, Value>,
    requests: Arc<Mutex<Vec<PathBuf>>>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, path: impl AsRef<Path>, value: Value) -> Self {
        self.sources.insert(path.as_ref().to_path_buf(), value);
        self
    }

    /// Shared handle to the paths requested so far, in order.
    pub fn requests(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        self.requests.clone()
    }
}

impl SourceLoader for InMemoryLoader {
    fn load(&self, path: &Path) -> Result<Value, LoadError> {
        self.requests.lock().push(path.to_path_buf());
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: path.to_path_buf(),
            })
    }
}
