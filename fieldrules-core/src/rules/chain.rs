//! Ordered replacement rules attached to a single field.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::errors::CompileError;
use crate::rules::replace_rule::ReplaceRule;

/// A field with a list of pattern replace rules attached.
///
/// Rules run in insertion order, each one consuming the output of the
/// previous one. Applying a chain twice is not guaranteed to be a no-op when
/// a pattern can match text produced by an earlier replacement.
#[derive(Debug, Clone)]
pub struct FieldRuleChain {
    field_name: String,
    rules: Vec<Arc<ReplaceRule>>,
}

impl FieldRuleChain {
    /// Creates an empty chain for `field_name`.
    pub fn new(field_name: &str) -> Result<Self, CompileError> {
        if field_name.is_empty() {
            return Err(CompileError::InvalidField);
        }
        Ok(Self { field_name: field_name.to_string(), rules: Vec::new() })
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn rules(&self) -> &[Arc<ReplaceRule>] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn add(&mut self, rule: Arc<ReplaceRule>) {
        self.rules.push(rule);
    }

    /// Runs `value` through every rule in order.
    pub fn apply(&self, value: &str) -> String {
        let mut current = Cow::Borrowed(value);
        for rule in &self.rules {
            let replaced = match rule.apply(&current) {
                Cow::Owned(s) => s,
                Cow::Borrowed(_) => continue,
            };
            current = Cow::Owned(replaced);
        }
        current.into_owned()
    }
}

impl fmt::Display for FieldRuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.field_name)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", rule)?;
        }
        write!(f, "]")
    }
}
