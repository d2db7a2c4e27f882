//! `docmux build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use docmux_config::{CliSettings, Config, OnMissingSource};
use docmux_index::{
    IndexBuilder, IndexStore, MissingSourcePolicy, PrefetchedCheckouts, fetch_all,
    load_local_navigation, write_json_atomic,
};
use docmux_routes::{LinkPrefixer, PathResolver, discover_local, discover_source, plan_pages};
use docmux_sources::{BuildMode, Diagnostics, SourceRegistry};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover docmux.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build mode; development prints source validation warnings.
    #[arg(long, env = "DOCMUX_ENV")]
    mode: Option<BuildMode>,

    /// Local content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Leave out sources whose navigation file is missing instead of failing.
    #[arg(long)]
    skip_missing: bool,

    /// Enable verbose output (show timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Counts reported at the end of a build.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct BuildSummary {
    pub sources: usize,
    pub nav_nodes: usize,
    pub pages: usize,
}

impl BuildArgs {
    /// Execute the build command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            mode: self.mode,
            content_dir: self.content_dir,
            missing_source: self.skip_missing.then_some(OnMissingSource::Skip),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        ensure_project_dir(&config.site_resolved.project_dir)?;

        output.info(&format!("Mode: {}", config.build_resolved.mode));
        output.info(&format!(
            "Content directory: {}",
            config.site_resolved.content_dir.display()
        ));
        output.info(&format!(
            "Checkouts: {}",
            config.site_resolved.checkout_dir.display()
        ));

        let summary = run_build(&config, Output::new())?;

        output.success(&format!(
            "Built {} pages from {} sources ({} navigation entries)",
            summary.pages, summary.sources, summary.nav_nodes
        ));
        output.highlight(&config.site_resolved.routes_path().display().to_string());
        Ok(())
    }
}

/// Run a full build pass for a loaded configuration.
///
/// Registry diagnostics are written to `diagnostics_output` when the build
/// mode allows it.
pub(crate) fn run_build(
    config: &Config,
    diagnostics_output: Output,
) -> Result<BuildSummary, CliError> {
    let site = &config.site_resolved;
    let diagnostics = Diagnostics::new(config.build_resolved.mode, diagnostics_output);
    let registry = SourceRegistry::validate(&config.sources, &diagnostics);

    // Barrier: nothing below reads a checkout before every fetch is done
    fetch_all(&registry, &PrefetchedCheckouts, &site.checkout_dir)?;

    let policy = match config.build_resolved.missing_source {
        OnMissingSource::Fail => MissingSourcePolicy::Fail,
        OnMissingSource::Skip => MissingSourcePolicy::Skip,
    };
    let local = load_local_navigation(&site.local_nav_path())?;
    let index = IndexBuilder::new(site.checkout_dir.clone())
        .with_policy(policy)
        .build(&registry, local)?;

    let mut documents = discover_local(&site.content_dir);
    for source in &registry {
        // Sources left out of the index contribute no pages
        if index.get(&source.name).is_some() {
            documents.extend(discover_source(source, &site.checkout_dir)?);
        }
    }

    let resolved = PathResolver::new(&registry).resolve_all(&documents)?;
    let routes = plan_pages(&resolved);

    // Artifacts are written together once every check has passed
    IndexStore::new(site.index_path()).write(&index)?;
    write_json_atomic(&site.routes_path(), &routes)?;
    write_json_atomic(&site.link_rules_path(), LinkPrefixer::new(&registry).rules())?;

    tracing::info!(pages = routes.len(), "Page routes written");

    Ok(BuildSummary {
        sources: index.len() - 1,
        nav_nodes: index.node_count(),
        pages: routes.len(),
    })
}

/// Ensure the `.docmux/` project directory exists with a `.gitignore`.
fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by docmux\n*\n");
    }

    Ok(())
}
