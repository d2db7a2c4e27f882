//! Relative link prefixing for source documents.
//!
//! A link written inside a source repository, such as `../install.md`, is
//! relative to that repository's layout. Once the page is served under the
//! source's base URI the link must be rewritten to the absolute site path.

use std::borrow::Cow;

use docmux_nav::has_scheme;
use docmux_sources::SourceRegistry;
use serde::Serialize;

use crate::resolver::ResolvedDocument;

/// Rewrite rule for the documents of one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRule {
    /// Source whose documents the rule applies to.
    pub source_name: String,
    /// Site path prefix, e.g. `/farmos/docs`.
    pub prefix: String,
}

/// Rewrites relative links in source documents to absolute site paths.
///
/// Local documents have no rule and are never rewritten.
#[derive(Debug, Clone, Default)]
pub struct LinkPrefixer {
    rules: Vec<LinkRule>,
}

impl LinkPrefixer {
    /// Derive one rule per registered source.
    pub fn new(registry: &SourceRegistry) -> Self {
        let rules = registry
            .iter()
            .map(|source| {
                let prefix = docmux_nav::join_site_path(&source.base_uri, "");
                LinkRule {
                    source_name: source.name.clone(),
                    prefix: prefix.trim_end_matches('/').to_owned(),
                }
            })
            .collect();
        Self { rules }
    }

    /// Rule for a source, if it has one.
    pub fn rule(&self, source_name: &str) -> Option<&LinkRule> {
        self.rules.iter().find(|rule| rule.source_name == source_name)
    }

    /// All rules in registry order.
    pub fn rules(&self) -> &[LinkRule] {
        &self.rules
    }

    /// Rewrite `href` found in `document`.
    ///
    /// `build` only persists [`rules`](Self::rules); this is the reference
    /// behaviour a render layer applies with them, one href at a time.
    ///
    /// Relative paths are resolved against the document's directory and
    /// cannot climb above the source prefix. Absolute paths, fragments,
    /// queries and URLs with a scheme are returned unchanged.
    pub fn rewrite<'a>(&self, document: &ResolvedDocument, href: &'a str) -> Cow<'a, str> {
        let Some(rule) = self.rule(&document.source_name) else {
            return Cow::Borrowed(href);
        };
        if !is_relative(href) {
            return Cow::Borrowed(href);
        }

        let split = href.find(['?', '#']).unwrap_or(href.len());
        let (path, suffix) = href.split_at(split);

        let floor = segments(&rule.prefix).count();
        let mut resolved: Vec<&str> = segments(&document.canonical_path).collect();
        // Drop the document's own file name
        if resolved.len() > floor {
            resolved.pop();
        }
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if resolved.len() > floor {
                        resolved.pop();
                    }
                }
                name => resolved.push(name),
            }
        }

        let trailing = if path.ends_with('/') && !resolved.is_empty() {
            "/"
        } else {
            ""
        };
        Cow::Owned(format!("/{}{trailing}{suffix}", resolved.join("/")))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Whether `href` is a relative path reference.
fn is_relative(href: &str) -> bool {
    if href.is_empty() || href.starts_with(['/', '#', '?']) {
        return false;
    }
    !has_scheme(href)
}
