// fieldrules/src/lib.rs
//! # fieldrules CLI Application
//!
//! This crate provides the command-line host for the `fieldrules-core` rule
//! engine: `check` validates a rule configuration, `process` filters and
//! transforms JSON documents with it.

pub mod cli;
pub mod commands;
pub mod errors;
pub mod logger;
pub mod ui;

use anyhow::Result;

use crate::cli::{Cli, Commands};

/// Dispatches a parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Check(cmd) => commands::check::run_check(cmd),
        Commands::Process(cmd) => commands::process::run_process(cmd, cli.quiet),
    }
}
