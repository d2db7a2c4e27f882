//! Document discovery by filesystem walking.
//!
//! Discovery only finds markdown files and records where they live; no
//! content is read. Hidden files and directories are skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use docmux_sources::{LOCAL_SOURCE_NAME, SourceDescriptor};
use glob::{MatchOptions, Pattern};

/// A markdown document found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Owning source, or the local site name.
    pub source_name: String,
    /// `/`-separated path relative to the checkout or local content root.
    pub relative_path: String,
    /// Location on disk, when discovered from the filesystem.
    pub file_path: Option<PathBuf>,
}

impl SourceDocument {
    /// Create a document reference without a file location.
    pub fn new(source_name: &str, relative_path: &str) -> Self {
        Self {
            source_name: source_name.to_owned(),
            relative_path: relative_path.to_owned(),
            file_path: None,
        }
    }

    /// Create a local site document reference.
    pub fn local(relative_path: &str) -> Self {
        Self::new(LOCAL_SOURCE_NAME, relative_path)
    }
}

impl fmt::Display for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_name, self.relative_path)
    }
}

/// Discovery error.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The source's file pattern is not a valid glob.
    #[error("source {name}: invalid pattern `{pattern}`: {error}")]
    Pattern {
        /// Source name.
        name: String,
        /// Offending pattern.
        pattern: String,
        /// Underlying glob error.
        #[source]
        error: glob::PatternError,
    },
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Find the local site's markdown documents under `content_dir`.
///
/// Returns an empty list if the directory doesn't exist.
pub fn discover_local(content_dir: &Path) -> Vec<SourceDocument> {
    let documents: Vec<_> = walk_markdown(content_dir)
        .into_iter()
        .map(|(relative_path, file_path)| SourceDocument {
            source_name: LOCAL_SOURCE_NAME.to_owned(),
            relative_path,
            file_path: Some(file_path),
        })
        .collect();
    tracing::debug!(
        dir = %content_dir.display(),
        documents = documents.len(),
        "Local documents discovered"
    );
    documents
}

/// Find a source's markdown documents under `checkout_root/{name}` that
/// match the source's file pattern.
pub fn discover_source(
    source: &SourceDescriptor,
    checkout_root: &Path,
) -> Result<Vec<SourceDocument>, DiscoveryError> {
    let pattern = Pattern::new(source.pattern()).map_err(|error| DiscoveryError::Pattern {
        name: source.name.clone(),
        pattern: source.pattern().to_owned(),
        error,
    })?;

    let root = checkout_root.join(&source.name);
    let documents: Vec<_> = walk_markdown(&root)
        .into_iter()
        .filter(|(relative_path, _)| pattern.matches_with(relative_path, MATCH_OPTIONS))
        .map(|(relative_path, file_path)| SourceDocument {
            source_name: source.name.clone(),
            relative_path,
            file_path: Some(file_path),
        })
        .collect();
    tracing::debug!(
        source = %source.name,
        documents = documents.len(),
        "Source documents discovered"
    );
    Ok(documents)
}

/// Collect `(relative_path, file_path)` for every `.md` file below `root`,
/// in sorted order.
fn walk_markdown(root: &Path) -> Vec<(String, PathBuf)> {
    let mut found = Vec::new();
    if root.is_dir() {
        walk_directory(root, "", &mut found);
    }
    found
}

fn walk_directory(dir: &Path, prefix: &str, found: &mut Vec<(String, PathBuf)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "Skipping unreadable directory");
        return;
    };

    let mut entries: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| {
            let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
            let name = e.file_name().to_string_lossy().into_owned();
            (e.path(), is_dir, name)
        })
        .filter(|(_, _, name)| !name.starts_with('.'))
        .collect();
    entries.sort_by(|a, b| a.2.cmp(&b.2));

    for (path, is_dir, name) in entries {
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if is_dir {
            walk_directory(&path, &relative, found);
        } else if path.extension().is_some_and(|e| e == "md") {
            found.push((relative, path));
        }
    }
}
