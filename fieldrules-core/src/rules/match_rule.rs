//! Field match rules for the allow/disallow engine.

use regex::Regex;
use std::fmt;

use crate::errors::CompileError;
use crate::rules::compile_pattern;

/// A compiled `field =~ m/pattern/` rule.
///
/// Matching uses search semantics: the pattern may match anywhere in the
/// value unless it is anchored itself.
#[derive(Debug, Clone)]
pub struct MatchRule {
    field: String,
    pattern: Regex,
}

impl MatchRule {
    /// Compiles a match rule for `field`.
    ///
    /// # Errors
    ///
    /// [`CompileError::InvalidField`] if `field` is empty,
    /// [`CompileError::InvalidPattern`] if `pattern` is empty or not a valid regex.
    pub fn compile(field: &str, pattern: &str) -> Result<Self, CompileError> {
        if field.is_empty() {
            return Err(CompileError::InvalidField);
        }
        let pattern = compile_pattern(pattern)?;
        Ok(Self { field: field.to_string(), pattern })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn source_pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// True if the pattern is found in `value`. An absent value never matches.
    pub fn matches<'v>(&self, value: impl Into<Option<&'v str>>) -> bool {
        value.into().is_some_and(|v| self.pattern.is_match(v))
    }
}

impl PartialEq for MatchRule {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.source_pattern() == other.source_pattern()
    }
}

impl Eq for MatchRule {}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} =~ m/{}/", self.field, self.source_pattern())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_legal_rule() {
        let rule = MatchRule::compile("content_type", "default").unwrap();
        assert_eq!(rule.field(), "content_type");
        assert_eq!(rule.source_pattern(), "default");
    }

    #[test]
    fn compile_rejects_empty_field() {
        assert!(matches!(
            MatchRule::compile("", "default"),
            Err(CompileError::InvalidField)
        ));
    }

    #[test]
    fn compile_rejects_empty_pattern() {
        assert!(matches!(
            MatchRule::compile("content_type", ""),
            Err(CompileError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn compile_rejects_illegal_pattern() {
        assert!(matches!(
            MatchRule::compile("content_type", "(fi+"),
            Err(CompileError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn match_value() {
        let rule = MatchRule::compile("content_type", r"^\d{2}$").unwrap();
        assert!(!rule.matches(None));
        assert!(!rule.matches(""));
        assert!(!rule.matches("a1b2"));
        assert!(!rule.matches("a42x"));
        assert!(rule.matches("42"));
    }

    #[test]
    fn unanchored_pattern_searches() {
        let rule = MatchRule::compile("content_type", "news").unwrap();
        assert!(rule.matches("breaking news today"));
        assert!(rule.matches(Some("news")));
    }

    #[test]
    fn display_format() {
        let rule = MatchRule::compile("field", "matchPattern").unwrap();
        assert_eq!(rule.to_string(), "field =~ m/matchPattern/");
    }

    #[test]
    fn equality_is_structural() {
        let a = MatchRule::compile("content_type", "news").unwrap();
        let b = MatchRule::compile("content_type", "news").unwrap();
        let c = MatchRule::compile("content_type", "default").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
