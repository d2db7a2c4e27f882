//! Aggregated navigation index.

use docmux_nav::{NavNode, count_nodes};
use docmux_sources::LOCAL_SOURCE_NAME;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Navigation tree of one source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNavigation {
    /// Source name, or the local site name for the first entry.
    pub name: String,
    /// Parsed navigation tree.
    pub navigation: Vec<NavNode>,
}

/// Navigation of the whole site.
///
/// The first entry is always the local site; source entries follow in
/// registry order with unique names. Serializes as a bare JSON array:
///
/// ```json
/// [
///     {"name": "main-content", "navigation": [{"title": "Home", "path": "/index.md"}]},
///     {"name": "farmOS", "navigation": [{"title": "Install", "path": "/farmos/docs/install.md"}]}
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedIndex {
    entries: Vec<SourceNavigation>,
}

impl AggregatedIndex {
    /// Create an index holding only the local site navigation.
    pub fn new(local: Vec<NavNode>) -> Self {
        Self {
            entries: vec![SourceNavigation {
                name: LOCAL_SOURCE_NAME.to_owned(),
                navigation: local,
            }],
        }
    }

    /// Append a source's navigation.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidSnapshot`] if the name is already present.
    pub fn push(&mut self, name: &str, navigation: Vec<NavNode>) -> Result<(), IndexError> {
        if self.get(name).is_some() {
            return Err(IndexError::InvalidSnapshot(format!(
                "duplicate source `{name}`"
            )));
        }
        self.entries.push(SourceNavigation {
            name: name.to_owned(),
            navigation,
        });
        Ok(())
    }

    /// Local site navigation.
    pub fn local(&self) -> &[NavNode] {
        self.entries
            .first()
            .map_or(&[], |entry| entry.navigation.as_slice())
    }

    /// Navigation of the named source (or of the local site).
    pub fn get(&self, name: &str) -> Option<&[NavNode]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.navigation.as_slice())
    }

    /// All entries, local site first.
    pub fn entries(&self) -> &[SourceNavigation] {
        &self.entries
    }

    /// Number of entries including the local site.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries; only possible for an unvalidated snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of navigation nodes across all entries.
    pub fn node_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| count_nodes(&entry.navigation))
            .sum()
    }

    /// Check the invariants of a deserialized index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidSnapshot`] if the local site entry is not
    /// first or a name repeats.
    pub fn validate(&self) -> Result<(), IndexError> {
        match self.entries.first() {
            Some(first) if first.name == LOCAL_SOURCE_NAME => {}
            Some(first) => {
                return Err(IndexError::InvalidSnapshot(format!(
                    "first entry is `{}`, expected `{LOCAL_SOURCE_NAME}`",
                    first.name
                )));
            }
            None => return Err(IndexError::InvalidSnapshot("no entries".to_owned())),
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(IndexError::InvalidSnapshot(format!(
                    "duplicate source `{}`",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}
