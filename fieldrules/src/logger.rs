// fieldrules/src/logger.rs
//! Logger setup for the fieldrules binary.
//!
//! Without an explicit level the `RUST_LOG` environment variable applies,
//! defaulting to `warn` so skipped configuration entries are always visible.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

const DEFAULT_FILTER: &str = "warn";

/// Initializes `env_logger` writing to stderr. `level` overrides `RUST_LOG`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.target(Target::Stderr).format_timestamp(None);
    let _ = builder.try_init();
}

/// Maps the global CLI flags to a log level override.
pub fn level_for(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
