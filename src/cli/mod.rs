//! CLI command definitions for portal-api
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod config;

use clap::{Parser, Subcommand};
use config::ConfigCommand;
use std::path::PathBuf;

/// TACOKUMO portal API
#[derive(Parser, Debug)]
#[command(name = "portal-api", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: search ./config.yaml,
    /// ./config/config.yaml, /etc/portal-api/config.yaml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging while configuration is resolved
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}
