//! Configuration management for docmux.
//!
//! Parses `docmux.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [site]
//! content_dir = "src/content"
//! nav_file = "config.yml"
//!
//! [build]
//! mode = "${DOCMUX_ENV:-production}"
//! missing_source = "fail"
//!
//! [[sources]]
//! name = "farmOS"
//! remote = "https://github.com/farmOS/farmOS.git"
//! branch = "2.x"
//! pattern = "docs/**"
//! nav_file = "mkdocs.yml"
//! base_uri = "farmos/docs"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `build.mode`
//! - `cache.dir`
//! - `cache.checkout_dir`
//! - `sources[].remote`
//! - `sources[].branch`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use docmux_sources::{BuildMode, RawField, RawSource};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override build mode.
    pub mode: Option<BuildMode>,
    /// Override local content directory.
    pub content_dir: Option<PathBuf>,
    /// Override the missing navigation file policy.
    pub missing_source: Option<OnMissingSource>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docmux.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Build configuration (mode is an unexpanded string from TOML).
    build: BuildConfigRaw,
    /// Cache locations (relative strings from TOML).
    cache: CacheConfigRaw,
    /// External documentation sources, validated later by the registry.
    pub sources: Vec<RawSource>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    content_dir: Option<String>,
    nav_file: Option<String>,
}

/// Raw build configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    mode: Option<String>,
    missing_source: Option<OnMissingSource>,
}

/// Raw cache configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    dir: Option<String>,
    checkout_dir: Option<String>,
}

/// What to do when a source's navigation file is missing or unreadable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissingSource {
    /// Abort the build.
    #[default]
    Fail,
    /// Leave the source out of the index and warn.
    Skip,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory holding the site's own markdown.
    pub content_dir: PathBuf,
    /// Local navigation file, relative to `content_dir`.
    pub nav_file: String,
    /// Project directory for docmux data (.docmux/).
    pub project_dir: PathBuf,
    /// Directory for generated artifacts.
    pub cache_dir: PathBuf,
    /// Directory where each source is checked out under its name.
    pub checkout_dir: PathBuf,
}

impl SiteConfig {
    /// Path to the local navigation file.
    #[must_use]
    pub fn local_nav_path(&self) -> PathBuf {
        self.content_dir.join(&self.nav_file)
    }

    /// Path to the aggregated navigation index.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.cache_dir.join("source_data.json")
    }

    /// Path to the page route manifest.
    #[must_use]
    pub fn routes_path(&self) -> PathBuf {
        self.cache_dir.join("routes.json")
    }

    /// Path to the per-source link rewrite rules.
    #[must_use]
    pub fn link_rules_path(&self) -> PathBuf {
        self.cache_dir.join("link_rules.json")
    }
}

/// Resolved build configuration.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Build mode; gates registry diagnostics.
    pub mode: BuildMode,
    /// Missing navigation file policy.
    pub missing_source: OnMissingSource,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.mode`").
        field: String,
        /// Error message (e.g., "${`DOCMUX_ENV`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docmux.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(mode) = settings.mode {
            self.build_resolved.mode = mode;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.site_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(missing_source) = settings.missing_source {
            self.build_resolved.missing_source = missing_source;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let project_dir = base.join(".docmux");
        Self {
            site: SiteConfigRaw::default(),
            build: BuildConfigRaw::default(),
            cache: CacheConfigRaw::default(),
            sources: Vec::new(),
            site_resolved: SiteConfig {
                content_dir: base.join("src/content"),
                nav_file: "config.yml".to_owned(),
                cache_dir: project_dir.join("cache"),
                checkout_dir: project_dir.join("sources"),
                project_dir,
            },
            build_resolved: BuildConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Source entries are not checked here: the registry filters them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_resolved.nav_file, "site.nav_file")?;
        if self.site_resolved.content_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "site.content_dir cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mode) = self.build.mode {
            self.build.mode = Some(expand::expand_env(mode, "build.mode")?);
        }
        if let Some(ref dir) = self.cache.dir {
            self.cache.dir = Some(expand::expand_env(dir, "cache.dir")?);
        }
        if let Some(ref dir) = self.cache.checkout_dir {
            self.cache.checkout_dir = Some(expand::expand_env(dir, "cache.checkout_dir")?);
        }

        for (i, source) in self.sources.iter_mut().enumerate() {
            expand_raw_field(&mut source.remote, &format!("sources[{i}].remote"))?;
            expand_raw_field(&mut source.branch, &format!("sources[{i}].branch"))?;
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory and parse the
    /// build mode.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve_path = |path: Option<&str>, default: &Path| {
            path.map_or_else(|| default.to_path_buf(), |p| config_dir.join(p))
        };

        let project_dir = config_dir.join(".docmux");
        let cache_dir = resolve_path(self.cache.dir.as_deref(), &project_dir.join("cache"));
        let checkout_dir = resolve_path(
            self.cache.checkout_dir.as_deref(),
            &project_dir.join("sources"),
        );

        self.site_resolved = SiteConfig {
            content_dir: resolve_path(
                self.site.content_dir.as_deref(),
                &config_dir.join("src/content"),
            ),
            nav_file: self
                .site
                .nav_file
                .clone()
                .unwrap_or_else(|| "config.yml".to_owned()),
            project_dir,
            cache_dir,
            checkout_dir,
        };

        let mode = match self.build.mode.as_deref() {
            Some(mode) => mode
                .parse()
                .map_err(|e| ConfigError::Validation(format!("build.mode: {e}")))?,
            None => BuildMode::default(),
        };
        self.build_resolved = BuildConfig {
            mode,
            missing_source: self.build.missing_source.unwrap_or_default(),
        };

        Ok(())
    }
}

/// Expand a raw source field when it holds a string.
fn expand_raw_field(field: &mut Option<RawField>, name: &str) -> Result<(), ConfigError> {
    if let Some(RawField::Text(text)) = field {
        *text = expand::expand_env(text, name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.site_resolved.content_dir,
            PathBuf::from("/test/src/content")
        );
        assert_eq!(
            config.site_resolved.local_nav_path(),
            PathBuf::from("/test/src/content/config.yml")
        );
        assert_eq!(
            config.site_resolved.project_dir,
            PathBuf::from("/test/.docmux")
        );
        assert_eq!(
            config.site_resolved.index_path(),
            PathBuf::from("/test/.docmux/cache/source_data.json")
        );
        assert_eq!(
            config.site_resolved.routes_path(),
            PathBuf::from("/test/.docmux/cache/routes.json")
        );
        assert_eq!(
            config.site_resolved.link_rules_path(),
            PathBuf::from("/test/.docmux/cache/link_rules.json")
        );
        assert_eq!(
            config.site_resolved.checkout_dir,
            PathBuf::from("/test/.docmux/sources")
        );
        assert_eq!(config.build_resolved.mode, BuildMode::Production);
        assert_eq!(config.build_resolved.missing_source, OnMissingSource::Fail);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve(Path::new("/project")).unwrap();
        assert_eq!(config.build_resolved.mode, BuildMode::Production);
        assert_eq!(config.site_resolved.nav_file, "config.yml");
    }

    #[test]
    fn test_parse_sources() {
        let toml = r#"
[[sources]]
name = "farmOS"
remote = "https://github.com/farmOS/farmOS.git"
branch = "2.x"
pattern = "docs/**"
nav_file = "mkdocs.yml"
base_uri = "farmos/docs"

[[sources]]
name = "broken"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(
            config.sources[0],
            RawSource::new("farmOS", "mkdocs.yml", "farmos/docs")
                .with_remote("https://github.com/farmOS/farmOS.git", "2.x")
                .with_pattern("docs/**")
        );
        assert!(config.sources[1].base_uri.is_none());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[site]
content_dir = "content"
nav_file = "nav.yml"

[cache]
dir = "build/cache"
checkout_dir = "/var/checkouts"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(
            config.site_resolved.content_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(
            config.site_resolved.local_nav_path(),
            PathBuf::from("/project/content/nav.yml")
        );
        assert_eq!(
            config.site_resolved.cache_dir,
            PathBuf::from("/project/build/cache")
        );
        assert_eq!(
            config.site_resolved.checkout_dir,
            PathBuf::from("/var/checkouts")
        );
        assert_eq!(
            config.site_resolved.project_dir,
            PathBuf::from("/project/.docmux")
        );
    }

    #[test]
    fn test_resolve_build_section() {
        let toml = r#"
[build]
mode = "development"
missing_source = "skip"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(config.build_resolved.mode, BuildMode::Development);
        assert_eq!(config.build_resolved.missing_source, OnMissingSource::Skip);
    }

    #[test]
    fn test_unknown_mode_is_validation_error() {
        let mut config: Config = toml::from_str("[build]\nmode = \"staging\"").unwrap();
        let err = config.resolve(Path::new("/project")).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("build.mode"));
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_unknown_missing_source_policy_fails_parse() {
        let result: Result<Config, _> = toml::from_str("[build]\nmissing_source = \"retry\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings_mode() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            mode: Some(BuildMode::Development),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.build_resolved.mode, BuildMode::Development);
        assert_eq!(config.build_resolved.missing_source, OnMissingSource::Fail); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_content_dir_and_policy() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            content_dir: Some(PathBuf::from("/custom/content")),
            missing_source: Some(OnMissingSource::Skip),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.site_resolved.content_dir,
            PathBuf::from("/custom/content")
        );
        assert_eq!(config.build_resolved.missing_source, OnMissingSource::Skip);
        assert_eq!(
            config.site_resolved.project_dir,
            PathBuf::from("/test/.docmux")
        ); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.build_resolved.mode, BuildMode::Production);
        assert_eq!(
            config.site_resolved.content_dir,
            PathBuf::from("/test/src/content")
        );
    }

    #[test]
    fn test_expand_env_vars_mode_and_sources() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCMUX_TEST_CONFIG_ENV", "development");
            std::env::set_var("DOCMUX_TEST_CONFIG_BRANCH", "3.x");
        }

        let toml = r#"
[build]
mode = "${DOCMUX_TEST_CONFIG_ENV}"

[[sources]]
name = "farmOS"
remote = "https://github.com/farmOS/farmOS.git"
branch = "${DOCMUX_TEST_CONFIG_BRANCH}"
nav_file = "mkdocs.yml"
base_uri = "farmos/docs"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(config.build_resolved.mode, BuildMode::Development);
        assert_eq!(
            config.sources[0].branch.as_ref().and_then(RawField::as_text),
            Some("3.x")
        );

        unsafe {
            std::env::remove_var("DOCMUX_TEST_CONFIG_ENV");
            std::env::remove_var("DOCMUX_TEST_CONFIG_BRANCH");
        }
    }

    #[test]
    fn test_expand_env_vars_mode_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCMUX_TEST_CONFIG_UNSET_ENV");
        }

        let toml = r#"
[build]
mode = "${DOCMUX_TEST_CONFIG_UNSET_ENV:-production}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(config.build_resolved.mode, BuildMode::Production);
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCMUX_TEST_CONFIG_MISSING");
        }

        let toml = r#"
[[sources]]
name = "farmOS"
remote = "${DOCMUX_TEST_CONFIG_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("DOCMUX_TEST_CONFIG_MISSING"));
        assert!(err.to_string().contains("sources[0].remote"));
    }

    #[test]
    fn test_expand_skips_non_string_source_fields() {
        let toml = r#"
[[sources]]
name = "farmOS"
branch = 2
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert!(matches!(config.sources[0].branch, Some(RawField::NotText(_))));
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_nav_file_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site_resolved.nav_file = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.nav_file"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docmux.toml");
        std::fs::write(
            &path,
            r#"
[build]
mode = "development"

[[sources]]
name = "farmOS"
nav_file = "mkdocs.yml"
base_uri = "farmos/docs"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.build_resolved.mode, BuildMode::Development);
        assert_eq!(
            config.site_resolved.content_dir,
            dir.path().join("src/content")
        );
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/docmux.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
