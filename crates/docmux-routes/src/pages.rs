//! Page route planning.

use serde::{Deserialize, Serialize};

use crate::resolver::ResolvedDocument;

/// Render-time parameters handed to the page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// Canonical site path of the page.
    pub pathname: String,
    /// Source that owns the page; selects link rules at render time.
    pub source_instance_name: String,
}

/// One output page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRoute {
    /// URL the page is served at.
    pub path: String,
    /// Template parameters.
    pub context: PageContext,
}

/// Plan one page per resolved document, sorted by path.
pub fn plan_pages(documents: &[ResolvedDocument]) -> Vec<PageRoute> {
    let mut routes: Vec<PageRoute> = documents
        .iter()
        .map(|document| PageRoute {
            path: document.canonical_path.clone(),
            context: PageContext {
                pathname: document.canonical_path.clone(),
                source_instance_name: document.source_name.clone(),
            },
        })
        .collect();
    routes.sort_by(|a, b| a.path.cmp(&b.path));
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolved(path: &str, source: &str) -> ResolvedDocument {
        ResolvedDocument {
            canonical_path: path.to_owned(),
            source_name: source.to_owned(),
        }
    }

    #[test]
    fn test_plan_pages_sorted_by_path() {
        let routes = plan_pages(&[
            resolved("/guides/start", "main-content"),
            resolved("/farmos/docs/install.md", "farmOS"),
        ]);

        let paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/farmos/docs/install.md", "/guides/start"]);
        assert_eq!(routes[0].context.source_instance_name, "farmOS");
        assert_eq!(routes[0].context.pathname, routes[0].path);
    }

    #[test]
    fn test_route_serialization_shape() {
        let routes = plan_pages(&[resolved("/farmos/docs/install.md", "farmOS")]);

        assert_eq!(
            serde_json::to_value(&routes).unwrap(),
            serde_json::json!([{
                "path": "/farmos/docs/install.md",
                "context": {
                    "pathname": "/farmos/docs/install.md",
                    "sourceInstanceName": "farmOS"
                }
            }])
        );
    }

    #[test]
    fn test_plan_pages_empty() {
        assert!(plan_pages(&[]).is_empty());
    }
}
