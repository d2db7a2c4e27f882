//! `docmux check` command implementation.

use std::path::PathBuf;

use clap::Args;
use docmux_config::Config;
use docmux_sources::{SourceRegistry, Validation};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover docmux.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Every invalid source is reported regardless of build mode.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let validation = SourceRegistry::partition(&config.sources);
        report(&output, &validation);

        if validation.rejected.is_empty() {
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} of {} sources are invalid",
                validation.rejected.len(),
                config.sources.len()
            )))
        }
    }
}

fn report(output: &Output, validation: &Validation) {
    for source in &validation.registry {
        output.info(&format!("  {} -> /{}", source.name, source.base_uri.trim_matches('/')));
    }
    for rejected in &validation.rejected {
        output.warning(&rejected.to_string());
    }
    if validation.rejected.is_empty() {
        output.success(&format!("{} sources valid", validation.registry.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(config: &str) -> Result<(), CliError> {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("docmux.toml");
        std::fs::write(&path, config).unwrap();
        CheckArgs { config: Some(path) }.execute()
    }

    #[test]
    fn test_check_valid_sources() {
        check(
            r#"
[[sources]]
name = "farmOS"
nav_file = "mkdocs.yml"
base_uri = "farmos/docs"
"#,
        )
        .unwrap();
    }

    #[test]
    fn test_check_reports_invalid_sources() {
        let err = check(
            r#"
[[sources]]
name = "farmOS"
nav_file = "mkdocs.yml"
base_uri = "farmos/docs"

[[sources]]
name = "broken"
nav_file = "mkdocs.yml"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
        assert_eq!(err.to_string(), "1 of 2 sources are invalid");
    }

    #[test]
    fn test_check_without_sources() {
        check("").unwrap();
    }
}
