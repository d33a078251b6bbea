//! Compiled rule types and the builder that produces them.
//!
//! * `match_rule`: field + regex pairs used by the allow/disallow engine.
//! * `replace_rule`: id + regex + replacement used for value rewriting.
//! * `chain`: an ordered list of replace rules bound to one field.
//! * `builder`: turns a raw `RuleSetConfig` into compiled rules and a report.
//!
//! All compiled rules are immutable and `Send + Sync`.

pub mod builder;
pub mod chain;
pub mod match_rule;
pub mod replace_rule;

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::errors::CompileError;

/// Upper bound for the compiled size of a single pattern.
pub const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Compiles a rule pattern. Empty patterns are rejected.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, CompileError> {
    if pattern.is_empty() {
        return Err(CompileError::empty_pattern());
    }
    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| {
            debug!("Pattern [{}] failed to compile: {}", pattern, e);
            CompileError::from_regex(pattern, e)
        })
}
