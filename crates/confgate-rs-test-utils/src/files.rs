use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the config crate's on-disk fixtures.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("confgate-rs-config")
        .join("tests")
        .join("fixtures")
}

/// Write `contents` to `root/name`, creating parent directories if needed.
pub fn write_source(root: &Path, name: &str, contents: &str) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(&path, contents).expect("write");
    path
}
