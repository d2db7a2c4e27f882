//! Source registry validation.

use std::collections::HashSet;
use std::fmt;

use crate::LOCAL_SOURCE_NAME;
use crate::descriptor::{RawField, RawSource, SourceDescriptor};
use crate::diagnostics::Diagnostics;

/// Reason a configured source was dropped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Required fields are missing, empty, or not strings.
    #[error("invalid {}", .0.join(", "))]
    InvalidFields(Vec<String>),
    /// The name collides with the local site sentinel.
    #[error("name `{0}` is reserved for the local site")]
    ReservedName(String),
    /// An earlier source already uses this name.
    #[error("duplicate name `{0}`")]
    DuplicateName(String),
    /// An earlier source already serves pages under this base URI.
    #[error("duplicate base URI `{0}`")]
    DuplicateBaseUri(String),
}

/// A configured source that did not pass validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedSource {
    /// Zero-based position in the configured list.
    pub index: usize,
    /// Source name, when it was a string.
    pub name: Option<String>,
    /// Why the source was dropped.
    pub rejection: Rejection,
}

impl fmt::Display for RejectedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skipping source #{}", self.index + 1)?;
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            write!(f, " ({name})")?;
        }
        write!(f, ": {}.", self.rejection)
    }
}

/// Result of validating a configured source list.
#[derive(Debug, Default)]
pub struct Validation {
    /// Sources that passed, in configured order.
    pub registry: SourceRegistry,
    /// Sources that were dropped, in configured order.
    pub rejected: Vec<RejectedSource>,
}

/// Validated, ordered list of documentation sources.
///
/// Names and base URIs are unique, and no source uses the local site name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    /// Keep the valid sources, reporting each dropped one through `diagnostics`.
    ///
    /// Never fails: an invalid entry only removes that entry.
    pub fn validate(raw: &[RawSource], diagnostics: &Diagnostics) -> Self {
        let Validation { registry, rejected } = Self::partition(raw);
        for rejected_source in &rejected {
            diagnostics.warn(&rejected_source.to_string());
        }
        tracing::debug!(
            valid = registry.len(),
            rejected = rejected.len(),
            mode = %diagnostics.mode(),
            "Source registry validated"
        );
        registry
    }

    /// Split configured sources into valid descriptors and rejections.
    pub fn partition(raw: &[RawSource]) -> Validation {
        let mut validation = Validation::default();
        let mut names = HashSet::new();
        let mut base_uris = HashSet::new();

        for (index, source) in raw.iter().enumerate() {
            let name = source.name.as_ref().and_then(RawField::as_text);
            let reject = |rejection| RejectedSource {
                index,
                name: name.map(str::to_owned),
                rejection,
            };

            let descriptor = match check_required(source) {
                Ok(descriptor) => descriptor,
                Err(rejection) => {
                    validation.rejected.push(reject(rejection));
                    continue;
                }
            };

            if descriptor.name == LOCAL_SOURCE_NAME {
                validation
                    .rejected
                    .push(reject(Rejection::ReservedName(descriptor.name)));
            } else if names.contains(&descriptor.name) {
                validation
                    .rejected
                    .push(reject(Rejection::DuplicateName(descriptor.name)));
            } else if base_uris.contains(&normalized_base(&descriptor.base_uri)) {
                validation
                    .rejected
                    .push(reject(Rejection::DuplicateBaseUri(descriptor.base_uri)));
            } else {
                names.insert(descriptor.name.clone());
                base_uris.insert(normalized_base(&descriptor.base_uri));
                validation.registry.sources.push(descriptor);
            }
        }

        validation
    }

    /// Look up a source by name.
    pub fn get(&self, name: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// All sources in configured order.
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// Iterate over sources in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceDescriptor> {
        self.sources.iter()
    }

    /// Number of valid sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no source passed validation.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a SourceDescriptor;
    type IntoIter = std::slice::Iter<'a, SourceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

/// Check the three required fields, collecting every problem.
fn check_required(source: &RawSource) -> Result<SourceDescriptor, Rejection> {
    let mut problems = Vec::new();
    let name = required_text(source.name.as_ref(), "name", &mut problems);
    let nav_file = required_text(source.nav_file.as_ref(), "navFile", &mut problems);
    let base_uri = required_text(source.base_uri.as_ref(), "baseURI", &mut problems);

    match (name, nav_file, base_uri) {
        (Some(name), Some(nav_file), Some(base_uri)) => Ok(SourceDescriptor {
            name: name.to_owned(),
            remote: optional_text(source.remote.as_ref()),
            branch: optional_text(source.branch.as_ref()),
            pattern: optional_text(source.pattern.as_ref()),
            nav_file: nav_file.to_owned(),
            base_uri: base_uri.to_owned(),
            directory: optional_text(source.directory.as_ref()),
        }),
        _ => Err(Rejection::InvalidFields(problems)),
    }
}

fn required_text<'a>(
    field: Option<&'a RawField>,
    label: &str,
    problems: &mut Vec<String>,
) -> Option<&'a str> {
    let problem = match field {
        None => "missing",
        Some(RawField::NotText(_)) => "not a string",
        Some(RawField::Text(text)) if text.trim().is_empty() => "empty",
        Some(RawField::Text(text)) => return Some(text),
    };
    problems.push(format!("{label} ({problem})"));
    None
}

fn optional_text(field: Option<&RawField>) -> Option<String> {
    field.and_then(RawField::as_text).map(str::to_owned)
}

/// Base URIs compare without surrounding or doubled slashes.
fn normalized_base(base_uri: &str) -> String {
    base_uri
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
