//! Build-mode gated diagnostics.
//!
//! Validation warnings are useful while editing a site locally and noise in a
//! production build. Rather than reading process state, callers inject a
//! [`Diagnostics`] value that carries the mode and a sink to write to.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Build mode of the current pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Local editing; diagnostics are emitted.
    Development,
    /// Published build; diagnostics are suppressed.
    #[default]
    Production,
}

impl BuildMode {
    /// Whether diagnostics should be emitted in this mode.
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Error returned when parsing an unknown build mode.
#[derive(Debug, thiserror::Error)]
#[error("unknown build mode `{0}` (expected `development` or `production`)")]
pub struct ParseBuildModeError(String);

impl FromStr for BuildMode {
    type Err = ParseBuildModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ParseBuildModeError(s.to_owned())),
        }
    }
}

/// Destination for diagnostic messages.
pub trait DiagnosticSink: Send + Sync {
    /// Record a warning.
    fn warn(&self, message: &str);
}

/// Sink that forwards warnings to `tracing`.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "docmux::sources", "{message}");
    }
}

/// Diagnostic capability gated on the build mode.
pub struct Diagnostics {
    mode: BuildMode,
    sink: Box<dyn DiagnosticSink>,
}

impl Diagnostics {
    /// Create diagnostics writing to `sink` when `mode` allows it.
    pub fn new(mode: BuildMode, sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            mode,
            sink: Box::new(sink),
        }
    }

    /// Create diagnostics writing to `tracing`.
    pub fn tracing(mode: BuildMode) -> Self {
        Self::new(mode, TracingSink)
    }

    /// Build mode these diagnostics are configured for.
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Emit a warning. Dropped outside development mode.
    pub fn warn(&self, message: &str) {
        if self.mode.is_development() {
            self.sink.warn(message);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
