//! Source fetching and the aggregation barrier.
//!
//! Fetches are independent and run on the global rayon thread pool.
//! [`fetch_all`] is the join point: it returns only once every fetch has
//! finished, and fails if any of them failed.

use std::path::Path;
use std::time::Instant;

use docmux_sources::{SourceDescriptor, SourceRegistry};
use rayon::prelude::*;

use crate::error::FetchError;

/// Makes a source's files available under a checkout directory.
pub trait SourceFetcher: Send + Sync {
    /// Place the files of `source` under `dest`.
    fn fetch(&self, source: &SourceDescriptor, dest: &Path) -> Result<(), FetchError>;
}

/// Fetcher for checkouts produced by an external step (CI job, git hook).
///
/// Only verifies that `{checkout_root}/{name}` exists.
pub struct PrefetchedCheckouts;

impl SourceFetcher for PrefetchedCheckouts {
    fn fetch(&self, source: &SourceDescriptor, dest: &Path) -> Result<(), FetchError> {
        if dest.is_dir() {
            Ok(())
        } else {
            Err(FetchError::MissingCheckout {
                name: source.name.clone(),
                path: dest.to_path_buf(),
            })
        }
    }
}

/// Fetch every registered source into `checkout_root/{name}`.
///
/// Blocks until all fetches complete. Errors are reported in registry order;
/// the first one is returned.
pub fn fetch_all(
    registry: &SourceRegistry,
    fetcher: &dyn SourceFetcher,
    checkout_root: &Path,
) -> Result<(), FetchError> {
    let start = Instant::now();

    let results: Vec<Result<(), FetchError>> = registry
        .sources()
        .par_iter()
        .map(|source| {
            let dest = checkout_root.join(&source.name);
            let result = fetcher.fetch(source, &dest);
            if let Err(e) = &result {
                tracing::error!(source = %source.name, error = %e, "Source fetch failed");
            }
            result
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::info!(
        sources = results.len(),
        failed,
        elapsed_ms = start.elapsed().as_millis(),
        "Source fetches completed"
    );

    results.into_iter().collect()
}
