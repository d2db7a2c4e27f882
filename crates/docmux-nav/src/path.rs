//! Site path helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Matches runs of two or more path separators.
static MULTI_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("separator regex is valid"));

/// Collapse every run of consecutive `/` into a single `/`.
///
/// Idempotent: normalizing an already normalized path returns it unchanged.
///
/// # Examples
///
/// ```
/// use docmux_nav::normalize_path;
///
/// assert_eq!(normalize_path("//farmos//docs///index.md"), "/farmos/docs/index.md");
/// assert_eq!(normalize_path("/guides/start"), "/guides/start");
/// ```
pub fn normalize_path(path: &str) -> String {
    MULTI_SLASH.replace_all(path, "/").into_owned()
}

/// Join a base prefix and a relative path into an absolute site path.
///
/// The result always starts with `/` and never contains doubled separators,
/// whatever slashes `base` and `rest` carry.
///
/// # Examples
///
/// ```
/// use docmux_nav::join_site_path;
///
/// assert_eq!(join_site_path("farmos/docs", "install.md"), "/farmos/docs/install.md");
/// assert_eq!(join_site_path("/", "guides/start"), "/guides/start");
/// ```
pub fn join_site_path(base: &str, rest: &str) -> String {
    normalize_path(&format!("/{base}/{rest}"))
}

/// Whether `href` starts with a URI scheme (`https:`, `mailto:`, ...).
///
/// # Examples
///
/// ```
/// use docmux_nav::has_scheme;
///
/// assert!(has_scheme("https://farmos.org"));
/// assert!(!has_scheme("guides/install.md"));
/// ```
pub fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
