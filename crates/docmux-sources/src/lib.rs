//! Documentation source registry for docmux.
//!
//! A site aggregates documentation from several external repositories. Each
//! repository is declared as a [`RawSource`] in configuration and becomes a
//! [`SourceDescriptor`] once it passes validation. Validation is a filter:
//! invalid entries are dropped and reported through [`Diagnostics`], which
//! only speaks in [`BuildMode::Development`].
//!
//! # Example
//!
//! ```
//! use docmux_sources::{BuildMode, Diagnostics, RawSource, SourceRegistry};
//!
//! let raw = vec![
//!     RawSource::new("farmOS", "mkdocs.yml", "farmos/docs"),
//!     RawSource::default(),
//! ];
//! let registry = SourceRegistry::validate(&raw, &Diagnostics::tracing(BuildMode::Production));
//!
//! assert_eq!(registry.len(), 1);
//! assert_eq!(registry.get("farmOS").unwrap().base_uri, "farmos/docs");
//! ```

mod descriptor;
mod diagnostics;
mod registry;

pub use descriptor::{RawField, RawSource, SourceDescriptor};
pub use diagnostics::{BuildMode, DiagnosticSink, Diagnostics, ParseBuildModeError, TracingSink};
pub use registry::{Rejection, RejectedSource, SourceRegistry, Validation};

/// Source name reserved for the site's own documentation.
///
/// Always the first entry of the aggregated index and the source tag of every
/// locally authored document.
pub const LOCAL_SOURCE_NAME: &str = "main-content";
