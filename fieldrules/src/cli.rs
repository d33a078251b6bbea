// fieldrules/src/cli.rs
//! This file defines the command-line interface (CLI) for the fieldrules
//! application, including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "fieldrules",
    author = "Obscura Team (Relay)",
    version = env!("CARGO_PKG_VERSION"),
    about = "Filter and rewrite documents before they are indexed",
    long_about = "fieldrules applies a YAML rule configuration to JSON documents: an allow or disallow list decides which documents are indexed at all, markup is stripped from configured fields, and ordered pattern replacement rules rewrite field values.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `fieldrules` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Builds a rule configuration and reports what it contains and what was skipped.
    #[command(about = "Validate a rule configuration and summarize the compiled rule set.")]
    Check(CheckCommand),

    /// Runs every input document through the configured rules.
    #[command(about = "Filter and transform JSON documents with a rule configuration.")]
    Process(ProcessCommand),
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Path to the rule configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "FIELDRULES_CONFIG", help = "Path to the rule configuration file (YAML).")]
    pub config: PathBuf,

    /// Exit with a non-zero code if any configuration entry was skipped.
    #[arg(long, help = "Fail if any configuration entry was skipped.")]
    pub strict: bool,

    /// Print the summary as JSON to stdout.
    #[arg(long, help = "Print the rule set summary as JSON.")]
    pub json: bool,
}

/// Arguments for the `process` command.
#[derive(Parser, Debug)]
pub struct ProcessCommand {
    /// Path to the rule configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "FIELDRULES_CONFIG", help = "Path to the rule configuration file (YAML).")]
    pub config: PathBuf,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read documents from a file instead of stdin (JSON array or one object per line).")]
    pub input: Option<PathBuf>,

    /// Write accepted documents to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write accepted documents to a file instead of stdout.")]
    pub output: Option<PathBuf>,
}
