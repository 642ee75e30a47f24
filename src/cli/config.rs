//! Config subcommands for portal-api CLI
//!
//! `init` writes a sample config file, `validate` resolves and checks the
//! configuration, `show` prints the resolved tree with secrets masked.

use crate::config::{AuthMode, Resolved, generate_default_config, render};
use crate::format::OutputFormat;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a sample configuration file
    Init(InitArgs),

    /// Resolve and validate the configuration
    Validate(ValidateArgs),

    /// Display the resolved configuration
    Show(ShowArgs),
}

/// Arguments for the init subcommand
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    pub output: PathBuf,
}

/// Arguments for the validate subcommand
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Print a structured report instead of text
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Show secret values (use with caution)
    #[arg(short, long)]
    pub show_secrets: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

/// Summary of a successful validation.
#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    pub valid: bool,
    pub portal_name: &'a str,
    pub server_port: i64,
    pub auth_mode: AuthMode,
    pub config_file: Option<String>,
}

impl<'a> ValidationReport<'a> {
    pub fn new(resolved: &'a Resolved) -> Self {
        Self {
            valid: true,
            portal_name: &resolved.config.portal_name,
            server_port: resolved.config.server.port,
            auth_mode: resolved.auth_mode,
            config_file: resolved
                .source
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }

    pub fn to_text(&self) -> String {
        let config_file = self.config_file.as_deref().unwrap_or("(none)");
        format!(
            "Configuration is valid!\n\
             Portal Name: {}\n\
             Server Port: {}\n\
             Authentication: {}\n\
             Config File: {config_file}\n",
            self.portal_name, self.server_port, self.auth_mode
        )
    }
}

/// Output of `config validate` for an already validated configuration.
pub fn validate_output(resolved: &Resolved, format: Option<OutputFormat>) -> Result<String> {
    let report = ValidationReport::new(resolved);
    match format {
        None => Ok(report.to_text()),
        Some(OutputFormat::Yaml) => {
            serde_yaml::to_string(&report).context("Failed to encode validation report")
        }
        Some(OutputFormat::Json) => {
            serde_json::to_string_pretty(&report).context("Failed to encode validation report")
        }
    }
}

/// Output of `config show`.
pub fn show_output(resolved: &Resolved, args: &ShowArgs) -> Result<String> {
    render(&resolved.config, !args.show_secrets, args.format)
        .context("Failed to render configuration")
}

pub fn run_init(args: &InitArgs) -> Result<()> {
    generate_default_config(&args.output)?;
    println!("Configuration file generated: {}", args.output.display());
    println!("Please set required environment variables for sensitive information.");
    Ok(())
}

pub fn run_validate(resolved: &Resolved, args: &ValidateArgs) -> Result<()> {
    print!("{}", validate_output(resolved, args.format)?);
    Ok(())
}

pub fn run_show(resolved: &Resolved, args: &ShowArgs) -> Result<()> {
    let output = show_output(resolved, args)?;
    println!("{}", output.trim_end());
    Ok(())
}
