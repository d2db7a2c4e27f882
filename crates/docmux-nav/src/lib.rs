//! Navigation trees for docmux.
//!
//! This crate provides:
//! - [`NavNode`]: a navigation entry, either a link or a section of entries
//! - [`parse_navigation`]: builds a tree from a MkDocs-style `nav` description
//! - [`normalize_path`] / [`join_site_path`] / [`has_scheme`]: site path
//!   helpers shared with path resolution and link prefixing
//!
//! # Example
//!
//! ```
//! use docmux_nav::{NavNode, parse_navigation};
//!
//! let yaml: serde_yaml::Value = serde_yaml::from_str("- Home: index.md").unwrap();
//! let nav = parse_navigation(&yaml, "farmos/docs").unwrap();
//! assert_eq!(
//!     nav,
//!     vec![NavNode::link("Home", "/farmos/docs/index.md")]
//! );
//! ```

mod node;
mod parser;
mod path;

pub use node::{NavNode, count_nodes};
pub use parser::{NavError, parse_navigation};
pub use path::{has_scheme, join_site_path, normalize_path};
