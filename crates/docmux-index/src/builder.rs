//! Aggregated index construction.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use docmux_nav::{NavNode, parse_navigation};
use docmux_sources::{LOCAL_SOURCE_NAME, SourceDescriptor, SourceRegistry};

use crate::error::IndexError;
use crate::index::AggregatedIndex;

/// What to do with a source whose navigation file is missing or not YAML.
///
/// Malformed entries inside a readable file are always fatal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingSourcePolicy {
    /// Abort the build.
    #[default]
    Fail,
    /// Leave the source out of the index and log a warning.
    Skip,
}

/// Builds an [`AggregatedIndex`] from checked-out sources.
pub struct IndexBuilder {
    checkout_root: PathBuf,
    policy: MissingSourcePolicy,
}

impl IndexBuilder {
    /// Create a builder reading checkouts from `checkout_root/{name}`.
    #[must_use]
    pub fn new(checkout_root: PathBuf) -> Self {
        Self {
            checkout_root,
            policy: MissingSourcePolicy::default(),
        }
    }

    /// Set the missing navigation file policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MissingSourcePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Path of a source's navigation file.
    pub fn nav_path(&self, source: &SourceDescriptor) -> PathBuf {
        self.checkout_root.join(&source.name).join(&source.nav_file)
    }

    /// Assemble the index: local navigation first, then every source in
    /// registry order.
    ///
    /// Must run after every fetch has completed.
    pub fn build(
        &self,
        registry: &SourceRegistry,
        local: Vec<NavNode>,
    ) -> Result<AggregatedIndex, IndexError> {
        let start = Instant::now();
        let mut index = AggregatedIndex::new(local);

        for source in registry {
            match self.load_source(source) {
                Ok(navigation) => {
                    tracing::debug!(
                        source = %source.name,
                        nodes = docmux_nav::count_nodes(&navigation),
                        "Source navigation loaded"
                    );
                    index.push(&source.name, navigation)?;
                }
                Err(e) if e.is_missing_navigation() && self.policy == MissingSourcePolicy::Skip => {
                    tracing::warn!(source = %source.name, error = %e, "Skipping source");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            sources = index.len() - 1,
            nodes = index.node_count(),
            elapsed_ms = start.elapsed().as_millis(),
            "Navigation index built"
        );

        Ok(index)
    }

    fn load_source(&self, source: &SourceDescriptor) -> Result<Vec<NavNode>, IndexError> {
        load_navigation(&self.nav_path(source), &source.name, &source.base_uri)
    }
}

/// Load the local site navigation; its links are rooted at `/`.
pub fn load_local_navigation(path: &Path) -> Result<Vec<NavNode>, IndexError> {
    load_navigation(path, LOCAL_SOURCE_NAME, "/")
}

fn load_navigation(path: &Path, name: &str, base: &str) -> Result<Vec<NavNode>, IndexError> {
    let content = fs::read_to_string(path).map_err(|error| IndexError::Read {
        name: name.to_owned(),
        path: path.to_path_buf(),
        error,
    })?;
    let raw: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|error| IndexError::Parse {
            name: name.to_owned(),
            path: path.to_path_buf(),
            error,
        })?;
    parse_navigation(&raw, base).map_err(|error| IndexError::Nav {
        name: name.to_owned(),
        error,
    })
}
