//! Navigation node type.

use serde::{Deserialize, Serialize};

/// Navigation entry for the site sidebar.
///
/// Serializes without a tag: links as `{"title", "path"}` and sections as
/// `{"title", "children"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavNode {
    /// A page link.
    Link {
        /// Display title.
        title: String,
        /// Absolute site path.
        path: String,
    },
    /// A titled group of entries.
    Section {
        /// Display title.
        title: String,
        /// Entries in display order.
        children: Vec<NavNode>,
    },
}

impl NavNode {
    /// Create a link node.
    pub fn link(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Link {
            title: title.into(),
            path: path.into(),
        }
    }

    /// Create a section node.
    pub fn section(title: impl Into<String>, children: Vec<NavNode>) -> Self {
        Self::Section {
            title: title.into(),
            children,
        }
    }

    /// Display title of this entry.
    pub fn title(&self) -> &str {
        match self {
            Self::Link { title, .. } | Self::Section { title, .. } => title,
        }
    }

    /// Number of entries in this subtree, counting this one.
    pub fn count(&self) -> usize {
        match self {
            Self::Link { .. } => 1,
            Self::Section { children, .. } => 1 + count_nodes(children),
        }
    }

    /// Collect every link path in this subtree, in display order.
    pub fn link_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_link_paths(&mut paths);
        paths
    }

    fn collect_link_paths<'a>(&'a self, paths: &mut Vec<&'a str>) {
        match self {
            Self::Link { path, .. } => paths.push(path),
            Self::Section { children, .. } => {
                for child in children {
                    child.collect_link_paths(paths);
                }
            }
        }
    }
}

/// Total number of entries in a navigation forest.
pub fn count_nodes(nodes: &[NavNode]) -> usize {
    nodes.iter().map(NavNode::count).sum()
}
