// fieldrules-core/src/lib.rs
//! # fieldrules Core Library
//!
//! `fieldrules-core` provides the rule engine applied to documents while they
//! are ingested into a search index. It compiles a loosely typed rule
//! configuration into immutable rules and applies them per document:
//!
//! 1. an allow/disallow filter accepts or rejects the whole document based on
//!    regex matches against configured fields;
//! 2. a markup stage strips HTML from configured fields, optionally followed
//!    by whitespace normalization;
//! 3. ordered chains of regex replacement rules rewrite field values.
//!
//! ## Modules
//!
//! * `config`: The raw `RuleSetConfig` as loaded from YAML.
//! * `rules`: `MatchRule`, `ReplaceRule`, `FieldRuleChain` and the `RuleSetBuilder`.
//! * `report`: The `BuildReport` listing configuration entries the builder skipped.
//! * `engines`: The `AllowDisallowEngine` and the `FieldTransformEngine`.
//! * `markup`: The `MarkupStripper` collaborator and the built-in `HtmlStripper`.
//! * `document`: The `Document` trait and the `InputDocument` implementation.
//! * `pipeline`: Decide-then-transform over a single document.
//! * `errors`: Error types.
//!
//! ## Usage Example
//!
//! ```rust
//! use fieldrules_core::{Decision, InputDocument, Pipeline, RuleSetConfig};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = RuleSetConfig::from_yaml_str(r#"
//! allow:
//!   - { name: content_type, value: default }
//! rules:
//!   - { id: prefix, pattern: '^\d{4}', replace: '****' }
//! fields:
//!   - { name: card, value: prefix }
//! "#)?;
//!     let (pipeline, report) = Pipeline::from_config(&config);
//!     assert!(report.is_clean());
//!
//!     let mut doc = InputDocument::new();
//!     doc.add_value("content_type", "default");
//!     doc.add_value("card", "3333-1111-2222-3333");
//!
//!     assert_eq!(pipeline.process(&mut doc)?, Decision::Accept);
//!     assert_eq!(doc.text("card"), Some("****-1111-2222-3333"));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems never fail a build; they are collected in a
//! [`BuildReport`]. Compiling a single rule returns a [`CompileError`], and the
//! only runtime failure is a [`TransformError`] raised by the markup stripper.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod document;
pub mod engines;
pub mod errors;
pub mod markup;
pub mod pipeline;
pub mod report;
pub mod rules;

/// Re-exports the raw configuration types.
pub use config::{ConfigValue, NamedEntry, NamedList, RuleDefinition, RuleEntry, RuleSetConfig};

/// Re-exports the error types.
pub use errors::{CompileError, FieldRulesError, TransformError};

/// Re-exports the compiled rule types and the builder.
pub use rules::builder::{RuleSet, RuleSetBuilder, StripSettings};
pub use rules::chain::FieldRuleChain;
pub use rules::match_rule::MatchRule;
pub use rules::replace_rule::ReplaceRule;

pub use report::{BuildReport, Section, SkipReason, SkippedEntry};

/// Re-exports the engines.
pub use engines::allow_disallow::{AllowDisallowEngine, AllowDisallowMode, Decision};
pub use engines::transform::FieldTransformEngine;

pub use document::{parse_documents, Document, DocumentField, FieldValue, InputDocument};
pub use markup::{HtmlStripper, MarkupStage, MarkupStripper, SpaceNormalizer};
pub use pipeline::{process_with_config_str, Pipeline};
