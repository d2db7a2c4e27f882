//! Aggregation error types.

use std::path::PathBuf;

use docmux_nav::NavError;

/// Error raised while making a source checkout available.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The checkout directory does not exist after the fetch step.
    #[error("source {name}: checkout not found at {}", path.display())]
    MissingCheckout {
        /// Source name.
        name: String,
        /// Expected checkout directory.
        path: PathBuf,
    },
    /// The fetcher reported a failure.
    #[error("source {name}: fetch failed: {message}")]
    Failed {
        /// Source name.
        name: String,
        /// Fetcher-provided description.
        message: String,
    },
}

impl FetchError {
    /// Name of the source the error belongs to.
    pub fn source_name(&self) -> &str {
        match self {
            Self::MissingCheckout { name, .. } | Self::Failed { name, .. } => name,
        }
    }
}

/// Error raised while building, writing or reading the aggregated index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Source fetching did not complete.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A navigation file could not be read.
    #[error("source {name}: cannot read navigation file {}: {error}", path.display())]
    Read {
        /// Source name.
        name: String,
        /// Navigation file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },
    /// A navigation file is not valid YAML.
    #[error("source {name}: cannot parse navigation file {}: {error}", path.display())]
    Parse {
        /// Source name.
        name: String,
        /// Navigation file path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        error: serde_yaml::Error,
    },
    /// A navigation file contains a malformed entry.
    #[error("source {name}: {error}")]
    Nav {
        /// Source name.
        name: String,
        /// Underlying navigation error.
        #[source]
        error: NavError,
    },
    /// Reading or writing an artifact failed.
    #[error("I/O error on {}: {error}", path.display())]
    Io {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },
    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A persisted index violates the index invariants.
    #[error("invalid index snapshot: {0}")]
    InvalidSnapshot(String),
}

impl IndexError {
    /// Whether the error comes from a missing or unparsable navigation file,
    /// as opposed to malformed entries or I/O on artifacts.
    pub fn is_missing_navigation(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }
}
