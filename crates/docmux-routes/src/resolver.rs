//! Canonical site path resolution.

use std::collections::HashMap;
use std::time::Instant;

use docmux_nav::{join_site_path, normalize_path};
use docmux_sources::{LOCAL_SOURCE_NAME, SourceRegistry};
use rayon::prelude::*;
use serde::Serialize;

use crate::discover::SourceDocument;

/// A document with its final site path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDocument {
    /// Absolute site path, unique across the build.
    pub canonical_path: String,
    /// Owning source, or the local site name.
    pub source_name: String,
}

/// Path resolution error.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Two documents resolved to the same site path.
    #[error("path collision at {path}: {first} and {second}")]
    Collision {
        /// Shared canonical path.
        path: String,
        /// Document that claimed the path first.
        first: SourceDocument,
        /// Document that collided with it.
        second: SourceDocument,
    },
}

/// Per-source data the resolver needs.
#[derive(Debug, Clone)]
struct Mount {
    base_uri: String,
    content_dir: String,
}

/// Assigns canonical site paths to documents.
///
/// Holds an immutable snapshot of the registry so it can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct PathResolver {
    mounts: HashMap<String, Mount>,
}

impl PathResolver {
    /// Create a resolver for the sources in `registry`.
    pub fn new(registry: &SourceRegistry) -> Self {
        let mounts = registry
            .iter()
            .map(|source| {
                let mount = Mount {
                    base_uri: source.base_uri.clone(),
                    content_dir: source.content_dir(),
                };
                (source.name.clone(), mount)
            })
            .collect();
        Self { mounts }
    }

    /// Resolve one document.
    ///
    /// Documents of a registered source are served under its base URI with
    /// the source's content directory stripped. Anything else is a local
    /// document and keeps its path under the local content root.
    pub fn resolve(&self, document: &SourceDocument) -> ResolvedDocument {
        match self.mounts.get(&document.source_name) {
            Some(mount) => ResolvedDocument {
                canonical_path: join_site_path(
                    &mount.base_uri,
                    strip_content_dir(&document.relative_path, &mount.content_dir),
                ),
                source_name: document.source_name.clone(),
            },
            None => ResolvedDocument {
                canonical_path: normalize_path(&format!("/{}", document.relative_path)),
                source_name: LOCAL_SOURCE_NAME.to_owned(),
            },
        }
    }

    /// Resolve every document in parallel and reject path collisions.
    ///
    /// Output order matches input order.
    pub fn resolve_all(
        &self,
        documents: &[SourceDocument],
    ) -> Result<Vec<ResolvedDocument>, ResolveError> {
        let start = Instant::now();

        let resolved: Vec<ResolvedDocument> =
            documents.par_iter().map(|d| self.resolve(d)).collect();

        let mut claimed: HashMap<&str, usize> = HashMap::with_capacity(resolved.len());
        for (i, document) in resolved.iter().enumerate() {
            if let Some(&first) = claimed.get(document.canonical_path.as_str()) {
                return Err(ResolveError::Collision {
                    path: document.canonical_path.clone(),
                    first: documents[first].clone(),
                    second: documents[i].clone(),
                });
            }
            claimed.insert(&document.canonical_path, i);
        }

        tracing::info!(
            documents = resolved.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Document paths resolved"
        );

        Ok(resolved)
    }
}

/// Drop the leading `content_dir` components from `relative_path`.
///
/// Only whole components match: `docs` strips `docs/a.md` but not `docsite/a.md`.
fn strip_content_dir<'a>(relative_path: &'a str, content_dir: &str) -> &'a str {
    let relative_path = relative_path.trim_start_matches('/');
    if content_dir.is_empty() {
        return relative_path;
    }
    match relative_path.strip_prefix(content_dir) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => relative_path,
    }
}
