// fieldrules-core/src/engines/allow_disallow.rs
//! Document level allow/disallow filtering.
//!
//! In allow mode only documents matching at least one rule are accepted; in
//! disallow mode documents matching any rule are rejected. A configuration
//! with neither section runs in unknown mode, which accepts everything.
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use std::fmt;

use crate::document::{Document, FieldValue};
use crate::rules::match_rule::MatchRule;

/// Placeholder used when a rejected document has no unique key value.
pub const UNKNOWN_DOCUMENT_KEY: &str = "<unknown>";

/// Mode of operation, fixed when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllowDisallowMode {
    /// No rules configured; every document passes.
    #[default]
    Unknown,
    /// Only documents matching a rule are indexed.
    Allow,
    /// Documents matching a rule are filtered out.
    Disallow,
}

impl fmt::Display for AllowDisallowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AllowDisallowMode::Unknown => "unknown",
            AllowDisallowMode::Allow => "allow",
            AllowDisallowMode::Disallow => "disallow",
        };
        f.write_str(name)
    }
}

/// Outcome of filtering one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn is_accept(self) -> bool {
        self == Decision::Accept
    }
}

/// Accepts or rejects whole documents by matching field values against
/// [`MatchRule`]s.
///
/// The default engine runs in [`AllowDisallowMode::Unknown`] and accepts
/// every document.
#[derive(Debug, Clone, Default)]
pub struct AllowDisallowEngine {
    mode: AllowDisallowMode,
    rules: Vec<MatchRule>,
    unique_key: Option<String>,
}

impl AllowDisallowEngine {
    pub fn new(mode: AllowDisallowMode, rules: Vec<MatchRule>) -> Self {
        Self { mode, rules, unique_key: None }
    }

    /// An engine that accepts every document.
    pub fn pass_through() -> Self {
        Self::default()
    }

    /// Names the field whose value identifies documents in rejection messages.
    pub fn with_unique_key(mut self, field: impl Into<String>) -> Self {
        self.unique_key = Some(field.into());
        self
    }

    pub fn mode(&self) -> AllowDisallowMode {
        self.mode
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn unique_key(&self) -> Option<&str> {
        self.unique_key.as_deref()
    }

    /// First rule, in configured order, matching any text value of its field.
    pub fn first_match<D: Document + ?Sized>(&self, doc: &D) -> Option<&MatchRule> {
        self.rules.iter().find(|rule| {
            doc.values(rule.field())
                .unwrap_or_default()
                .iter()
                .filter_map(FieldValue::as_text)
                .any(|value| rule.matches(value))
        })
    }

    pub fn any_rule_matches<D: Document + ?Sized>(&self, doc: &D) -> bool {
        self.first_match(doc).is_some()
    }

    /// Why `doc` would be rejected, or `None` if it would be accepted.
    pub fn rejection_reason<D: Document + ?Sized>(&self, doc: &D) -> Option<String> {
        match self.mode {
            AllowDisallowMode::Unknown => None,
            AllowDisallowMode::Allow => match self.first_match(doc) {
                Some(rule) => {
                    debug!("Document [{}] allowed by {}", self.document_key(doc), rule);
                    None
                }
                None => Some(format!(
                    "Document [{}] rejected: no rule matched in allow mode",
                    self.document_key(doc)
                )),
            },
            AllowDisallowMode::Disallow => self.first_match(doc).map(|rule| {
                format!(
                    "Document [{}] rejected: {} matched in disallow mode",
                    self.document_key(doc),
                    rule
                )
            }),
        }
    }

    /// Decides whether `doc` should be indexed.
    pub fn decide<D: Document + ?Sized>(&self, doc: &D) -> Decision {
        if self.mode == AllowDisallowMode::Unknown {
            warn!("No allow/disallow rules configured; accepting document without filtering.");
            return Decision::Accept;
        }
        match self.rejection_reason(doc) {
            Some(reason) => {
                info!("{}", reason);
                Decision::Reject
            }
            None => Decision::Accept,
        }
    }

    fn document_key<D: Document + ?Sized>(&self, doc: &D) -> String {
        let value = self.unique_key.as_deref().and_then(|key| doc.first_value(key));
        match value {
            Some(FieldValue::Text(s)) => s.clone(),
            Some(FieldValue::Other(v)) => v.to_string(),
            None => UNKNOWN_DOCUMENT_KEY.to_string(),
        }
    }
}
