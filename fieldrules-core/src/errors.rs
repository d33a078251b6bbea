//! errors.rs - Error types for the fieldrules-core library.
//!
//! Rule compilation, document transformation and the crate-level umbrella
//! error. Configuration problems found while building a rule set are not
//! errors: they are recorded as `SkipReason`s in the build report.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Failure to compile a single rule or chain.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("field name is empty")]
    InvalidField,

    #[error("rule id is empty")]
    InvalidId,

    #[error("invalid pattern [{pattern}]: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: String,
        #[source]
        source: Option<regex::Error>,
    },
}

impl CompileError {
    pub(crate) fn empty_pattern() -> Self {
        CompileError::InvalidPattern {
            pattern: String::new(),
            reason: "pattern is empty".to_string(),
            source: None,
        }
    }

    pub(crate) fn from_regex(pattern: &str, err: regex::Error) -> Self {
        CompileError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
            source: Some(err),
        }
    }
}

/// Failure while transforming a document's field values.
///
/// Compiled rules cannot fail at apply time, so the only source is the
/// markup stripping collaborator.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("markup stripping failed for field '{field}': {source}")]
    Strip {
        field: String,
        #[source]
        source: anyhow::Error,
    },
}

/// This enum represents all possible error types in the `fieldrules-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FieldRulesError {
    #[error("Failed to compile rule: {0}")]
    Compile(#[from] CompileError),

    #[error("Failed to transform document: {0}")]
    Transform(#[from] TransformError),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}
