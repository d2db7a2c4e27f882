//! Aggregated navigation index for docmux.
//!
//! The aggregation step runs once every source checkout is in place:
//!
//! 1. [`fetch_all`] drives a [`SourceFetcher`] over the registry and returns
//!    only after every fetch has finished.
//! 2. [`IndexBuilder`] reads each source's navigation file, parses it under
//!    the source's base URI, and assembles an [`AggregatedIndex`] with the
//!    local site first.
//! 3. [`IndexStore`] persists the index as one JSON document.
//!
//! The in-memory [`AggregatedIndex`] is what later steps consume; the JSON
//! file exists for tooling that runs outside the build.

mod builder;
mod error;
mod fetch;
mod index;
mod store;

pub use builder::{IndexBuilder, MissingSourcePolicy, load_local_navigation};
pub use error::{FetchError, IndexError};
pub use fetch::{PrefetchedCheckouts, SourceFetcher, fetch_all};
pub use index::{AggregatedIndex, SourceNavigation};
pub use store::{IndexStore, write_json_atomic};
