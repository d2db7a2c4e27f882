//! Document discovery and site path resolution for docmux.
//!
//! Every markdown document of a build pass, local or fetched from a source,
//! gets one canonical site path and the name of the source that owns it:
//!
//! - [`discover_local`] / [`discover_source`] walk the content trees
//! - [`PathResolver`] assigns canonical paths and rejects collisions
//! - [`LinkPrefixer`] rewrites relative links inside source documents
//! - [`plan_pages`] turns resolved documents into page routes
//!
//! # Example
//!
//! ```
//! use docmux_routes::{PathResolver, SourceDocument};
//! use docmux_sources::{BuildMode, Diagnostics, RawSource, SourceRegistry};
//!
//! let raw = vec![RawSource::new("farmOS", "mkdocs.yml", "farmos/docs").with_pattern("docs/**")];
//! let registry = SourceRegistry::validate(&raw, &Diagnostics::tracing(BuildMode::Production));
//! let resolver = PathResolver::new(&registry);
//!
//! let resolved = resolver.resolve(&SourceDocument::new("farmOS", "docs/install.md"));
//! assert_eq!(resolved.canonical_path, "/farmos/docs/install.md");
//! assert_eq!(resolved.source_name, "farmOS");
//! ```

mod discover;
mod links;
mod pages;
mod resolver;

pub use discover::{DiscoveryError, SourceDocument, discover_local, discover_source};
pub use links::{LinkPrefixer, LinkRule};
pub use pages::{PageContext, PageRoute, plan_pages};
pub use resolver::{PathResolver, ResolveError, ResolvedDocument};
