//! portal-api
//!
//! Command-line entry point: resolves, validates and displays the portal API
//! configuration.

use anyhow::{Context, Result};
use clap::Parser;
use portal_api::cli::config::{ConfigCommand, run_init, run_show, run_validate};
use portal_api::cli::{Cli, Command};
use portal_api::config::{ConfigLoader, Resolved, verify_schema};
use portal_api::logging;
use std::path::Path;
use tracing::debug;

/// Resolve the configuration under the bootstrap subscriber, then install the
/// global subscriber at the configured log level.
fn load_config(config_path: Option<&Path>, verbose: bool) -> Result<Resolved> {
    let loader = ConfigLoader::new();
    let resolved = tracing::subscriber::with_default(
        logging::subscriber(logging::bootstrap_level(verbose)),
        || loader.load(config_path),
    )
    .context("Failed to resolve configuration")?;

    logging::init(logging::level_from_str(&resolved.config.server.log_level))?;
    debug!(
        log_level = %resolved.config.server.log_level,
        auth_mode = %resolved.auth_mode,
        "Configuration resolved"
    );
    Ok(resolved)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    verify_schema().context("Built-in configuration schema is inconsistent")?;

    let Command::Config { action } = cli.command;
    match action {
        ConfigCommand::Init(args) => {
            logging::init(logging::bootstrap_level(cli.verbose))?;
            run_init(&args)
        }
        ConfigCommand::Validate(args) => {
            let resolved = load_config(cli.config.as_deref(), cli.verbose)?;
            run_validate(&resolved, &args)
        }
        ConfigCommand::Show(args) => {
            let resolved = load_config(cli.config.as_deref(), cli.verbose)?;
            run_show(&resolved, &args)
        }
    }
}
