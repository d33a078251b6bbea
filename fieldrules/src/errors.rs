// fieldrules/src/errors.rs
//! Errors raised by the CLI itself. Library failures travel as `anyhow` errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0} configuration entries were skipped (--strict)")]
    StrictCheckFailed(usize),
}
