//! `docmux nav` command implementation.

use std::path::PathBuf;

use clap::Args;
use console::Term;
use docmux_config::Config;
use docmux_index::{AggregatedIndex, IndexStore};

use crate::error::CliError;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Path to configuration file (default: auto-discover docmux.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only this source's navigation.
    #[arg(short, long)]
    source: Option<String>,
}

impl NavArgs {
    /// Execute the nav command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let index = IndexStore::new(config.site_resolved.index_path()).read()?;

        let json = render(&index, self.source.as_deref())?;
        Term::stdout().write_line(&json)?;
        Ok(())
    }
}

/// Pretty JSON of the whole index or of one source's navigation.
fn render(index: &AggregatedIndex, source: Option<&str>) -> Result<String, CliError> {
    match source {
        None => Ok(serde_json::to_string_pretty(index)?),
        Some(name) => {
            let navigation = index
                .get(name)
                .ok_or_else(|| CliError::Validation(format!("Unknown source: {name}")))?;
            Ok(serde_json::to_string_pretty(navigation)?)
        }
    }
}
