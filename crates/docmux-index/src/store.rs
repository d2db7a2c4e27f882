//! JSON persistence for build artifacts.
//!
//! Artifacts are written to a temporary file in the target directory and
//! renamed into place, so readers never observe a partial file. A write whose
//! content matches the file on disk leaves the file untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::IndexError;
use crate::index::AggregatedIndex;

/// File location of the persisted [`AggregatedIndex`].
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    /// Create a store writing to `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the index. Returns whether the file changed.
    pub fn write(&self, index: &AggregatedIndex) -> Result<bool, IndexError> {
        let changed = write_json_atomic(&self.path, index)?;
        tracing::info!(
            path = %self.path.display(),
            entries = index.len(),
            changed,
            "Navigation index written"
        );
        Ok(changed)
    }

    /// Load a previously persisted index.
    pub fn read(&self) -> Result<AggregatedIndex, IndexError> {
        let content = fs::read_to_string(&self.path).map_err(|error| IndexError::Io {
            path: self.path.clone(),
            error,
        })?;
        let index: AggregatedIndex = serde_json::from_str(&content)?;
        index.validate()?;
        Ok(index)
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// Returns `false` without touching the file when its content is already
/// identical.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<bool, IndexError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');

    if fs::read(path).is_ok_and(|existing| existing == content.as_bytes()) {
        tracing::debug!(path = %path.display(), "Artifact unchanged");
        return Ok(false);
    }

    let io_error = |error| IndexError::Io {
        path: path.to_path_buf(),
        error,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(io_error)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(content.as_bytes()).map_err(io_error)?;
    temp.persist(path).map_err(|e| io_error(e.error))?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmux_nav::NavNode;
    use pretty_assertions::assert_eq;

    fn sample() -> AggregatedIndex {
        let mut index = AggregatedIndex::new(vec![NavNode::link("Home", "/index.md")]);
        index
            .push("farmOS", vec![NavNode::link("Install", "/farmos/docs/install.md")])
            .unwrap();
        index
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(temp_dir.path().join("cache/source_data.json"));

        assert!(store.write(&sample()).unwrap());

        assert_eq!(store.read().unwrap(), sample());
    }

    #[test]
    fn test_rewrite_with_same_content_is_byte_identical() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(temp_dir.path().join("source_data.json"));

        store.write(&sample()).unwrap();
        let first = fs::read(store.path()).unwrap();
        let changed = store.write(&sample()).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert!(!changed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_replaces_changed_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(temp_dir.path().join("source_data.json"));

        store.write(&sample()).unwrap();
        let local_only = AggregatedIndex::new(Vec::new());
        assert!(store.write(&local_only).unwrap());

        assert_eq!(store.read().unwrap(), local_only);
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(temp_dir.path().join("source_data.json"));

        store.write(&sample()).unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["source_data.json"]);
    }

    #[test]
    fn test_read_rejects_invalid_snapshot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("source_data.json");
        fs::write(&path, r#"[{"name": "farmOS", "navigation": []}]"#).unwrap();

        let err = IndexStore::new(path).read().unwrap_err();

        assert!(matches!(err, IndexError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_read_missing_file() {
        let err = IndexStore::new(PathBuf::from("/nonexistent/source_data.json"))
            .read()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/source_data.json"));
    }
}
