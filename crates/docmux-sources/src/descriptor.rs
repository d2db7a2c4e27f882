//! Source descriptor types.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// A configuration value that may or may not be a string.
///
/// Registry validation must be able to drop a source whose fields have the
/// wrong type instead of failing the whole configuration, so raw fields accept
/// any value and validation decides.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// A string value.
    Text(String),
    /// Any non-string value (number, table, list, ...).
    NotText(IgnoredAny),
}

impl RawField {
    /// The string value, if this field holds one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NotText(_) => None,
        }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Source entry as declared in configuration, before validation.
///
/// Field names follow the `[[sources]]` table keys; `mkdocs` and `baseURI`
/// are accepted as aliases.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawSource {
    /// Unique source identifier.
    pub name: Option<RawField>,
    /// Remote repository location.
    pub remote: Option<RawField>,
    /// Branch or ref to fetch.
    pub branch: Option<RawField>,
    /// Glob of files to fetch, relative to the repository root.
    pub pattern: Option<RawField>,
    /// Navigation description file within the fetched tree.
    #[serde(alias = "mkdocs", alias = "navFile")]
    pub nav_file: Option<RawField>,
    /// URL path segment every page of the source is served under.
    #[serde(alias = "baseURI")]
    pub base_uri: Option<RawField>,
    /// Content subdirectory stripped from document paths.
    pub directory: Option<RawField>,
}

impl RawSource {
    /// Create a raw source with the three required fields set.
    pub fn new(name: &str, nav_file: &str, base_uri: &str) -> Self {
        Self {
            name: Some(name.into()),
            nav_file: Some(nav_file.into()),
            base_uri: Some(base_uri.into()),
            ..Self::default()
        }
    }

    /// Set the remote location and branch.
    #[must_use]
    pub fn with_remote(mut self, remote: &str, branch: &str) -> Self {
        self.remote = Some(remote.into());
        self.branch = Some(branch.into());
        self
    }

    /// Set the file-match pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the content subdirectory.
    #[must_use]
    pub fn with_directory(mut self, directory: &str) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// Default pattern when a source does not declare one.
const DEFAULT_PATTERN: &str = "**";

/// Validated documentation source.
///
/// `name`, `nav_file` and `base_uri` are guaranteed non-empty. Optional
/// fields that were present with a non-string value are treated as unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    /// Unique source identifier.
    pub name: String,
    /// Remote repository location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Branch or ref to fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Glob of files to fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Navigation description file within the fetched tree.
    #[serde(rename = "navFile")]
    pub nav_file: String,
    /// URL path segment every page of the source is served under.
    #[serde(rename = "baseURI")]
    pub base_uri: String,
    /// Explicit content subdirectory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl SourceDescriptor {
    /// File-match pattern, defaulting to every file.
    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    /// Content subdirectory stripped from document paths before prefixing.
    ///
    /// Uses `directory` when set, otherwise the glob-free leading directories
    /// of the pattern (`docs/**` gives `docs`, `**/*.md` gives nothing).
    pub fn content_dir(&self) -> String {
        if let Some(directory) = &self.directory {
            return directory.trim_matches('/').to_owned();
        }
        literal_dir_prefix(self.pattern())
    }
}

/// Leading directory components of a glob that contain no glob syntax.
fn literal_dir_prefix(pattern: &str) -> String {
    let components: Vec<&str> = pattern.split('/').filter(|c| !c.is_empty()).collect();
    let Some((_, dirs)) = components.split_last() else {
        return String::new();
    };
    dirs.iter()
        .take_while(|c| !c.contains(['*', '?', '[', '{']))
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}
