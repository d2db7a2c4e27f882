//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Strings without `${` are returned unchanged. Bare `$VAR` is not expanded.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of an environment variable that is not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCMUX_TEST_EXPAND_SET", "development");
        }
        let result = expand_env("${DOCMUX_TEST_EXPAND_SET}", "build.mode").unwrap();
        assert_eq!(result, "development");
        unsafe {
            std::env::remove_var("DOCMUX_TEST_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCMUX_TEST_EXPAND_UNSET");
        }
        let result = expand_env("${DOCMUX_TEST_EXPAND_UNSET:-production}", "build.mode").unwrap();
        assert_eq!(result, "production");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCMUX_TEST_EXPAND_HOST", "github.com");
        }
        let result = expand_env(
            "https://${DOCMUX_TEST_EXPAND_HOST}/farmOS/farmOS.git",
            "sources.remote",
        )
        .unwrap();
        assert_eq!(result, "https://github.com/farmOS/farmOS.git");
        unsafe {
            std::env::remove_var("DOCMUX_TEST_EXPAND_HOST");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCMUX_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${DOCMUX_TEST_EXPAND_MISSING}", "sources[0].branch").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("DOCMUX_TEST_EXPAND_MISSING"));
        assert!(err.to_string().contains("sources[0].branch"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        assert_eq!(expand_env("2.x", "f").unwrap(), "2.x");
        assert_eq!(expand_env("$HOME/docs", "f").unwrap(), "$HOME/docs");
    }
}
