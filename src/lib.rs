//! Portal API configuration library
//!
//! This module exports the configuration core and the CLI for testing and
//! integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
