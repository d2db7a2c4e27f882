//! MkDocs `nav` parsing.
//!
//! A navigation description is a YAML list of single-key mappings. Each key is
//! a display title; a string value is a page path relative to the source root
//! and a list value is a nested section:
//!
//! ```yaml
//! - Home: index.md
//! - Guides:
//!     - Install: install.md
//! ```
//!
//! A whole `mkdocs.yml` is accepted too, in which case its `nav` key is used.

use serde_yaml::{Mapping, Value};

use crate::node::NavNode;
use crate::path::{has_scheme, join_site_path};

/// Navigation description error.
///
/// Malformed input is always reported, never skipped, so a broken upstream
/// `nav` cannot silently drop pages from the site.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The document is neither a list of entries nor a mapping with `nav`.
    #[error("navigation must be a list of entries or a mapping with a `nav` list, found {found}")]
    UnexpectedRoot {
        /// Kind of value found at the top level.
        found: &'static str,
    },
    /// A single entry could not be interpreted.
    #[error("malformed navigation entry at {location}: {reason}: {entry}")]
    MalformedEntry {
        /// Title trail leading to the entry (e.g. "Guides > Advanced").
        location: String,
        /// What is wrong with the entry.
        reason: String,
        /// The offending entry rendered as YAML.
        entry: String,
    },
}

/// Parse a navigation description into a tree rooted at `base`.
///
/// Every link path becomes `/{base}/{value}` with doubled separators
/// collapsed, so the result only contains absolute site paths.
///
/// # Errors
///
/// Returns [`NavError`] for any entry that is not a single `title: value`
/// mapping with a string title and a string or list value. Values with a URI
/// scheme (`https://...`) are rejected since they have no site path.
pub fn parse_navigation(raw: &Value, base: &str) -> Result<Vec<NavNode>, NavError> {
    let entries = match raw {
        Value::Sequence(entries) => entries,
        Value::Mapping(mapping) => match mapping.get("nav") {
            Some(Value::Sequence(entries)) => entries,
            Some(other) => {
                return Err(NavError::UnexpectedRoot {
                    found: value_kind(other),
                });
            }
            None => return Err(NavError::UnexpectedRoot { found: "mapping without `nav`" }),
        },
        other => {
            return Err(NavError::UnexpectedRoot {
                found: value_kind(other),
            });
        }
    };

    let mut trail = Vec::new();
    parse_entries(entries, base, &mut trail)
}

fn parse_entries(
    entries: &[Value],
    base: &str,
    trail: &mut Vec<String>,
) -> Result<Vec<NavNode>, NavError> {
    entries
        .iter()
        .map(|entry| parse_entry(entry, base, trail))
        .collect()
}

fn parse_entry(entry: &Value, base: &str, trail: &mut Vec<String>) -> Result<NavNode, NavError> {
    let Value::Mapping(mapping) = entry else {
        return Err(malformed(trail, "expected a `title: path` mapping", entry));
    };
    let (title, value) = single_pair(mapping)
        .ok_or_else(|| malformed(trail, "expected exactly one title per entry", entry))?;
    let Some(title) = title.as_str() else {
        return Err(malformed(trail, "title must be a string", entry));
    };

    match value {
        Value::String(path) if has_scheme(path) => Err(malformed(
            trail,
            &format!("`{title}` links outside the site"),
            entry,
        )),
        Value::String(path) => Ok(NavNode::link(title, join_site_path(base, path))),
        Value::Sequence(children) => {
            trail.push(title.to_owned());
            let children = parse_entries(children, base, trail);
            trail.pop();
            Ok(NavNode::section(title, children?))
        }
        _ => Err(malformed(
            trail,
            &format!("value of `{title}` must be a path or a list"),
            entry,
        )),
    }
}

fn single_pair(mapping: &Mapping) -> Option<(&Value, &Value)> {
    let mut pairs = mapping.iter();
    let pair = pairs.next()?;
    pairs.next().is_none().then_some(pair)
}

fn malformed(trail: &[String], reason: &str, entry: &Value) -> NavError {
    let location = if trail.is_empty() {
        "top level".to_owned()
    } else {
        trail.join(" > ")
    };
    let entry = serde_yaml::to_string(entry)
        .map_or_else(|_| format!("{entry:?}"), |s| s.trim_end().to_owned());
    NavError::MalformedEntry {
        location,
        reason: reason.to_owned(),
        entry,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
