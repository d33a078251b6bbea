//! Pattern replacement rules.
//!
//! Replacement text follows the `regex` crate expansion syntax: `$1`,
//! `${name}` and `$$` for a literal dollar sign.

use regex::Regex;
use std::borrow::Cow;
use std::fmt;

use crate::errors::CompileError;
use crate::rules::compile_pattern;

/// A compiled pattern replacement rule, identified by `id` in field bindings.
#[derive(Debug, Clone)]
pub struct ReplaceRule {
    id: String,
    pattern: Regex,
    replacement: String,
}

impl ReplaceRule {
    /// Compiles a replacement rule. A missing replacement means the empty string.
    ///
    /// # Errors
    ///
    /// [`CompileError::InvalidId`] if `id` is empty,
    /// [`CompileError::InvalidPattern`] if `pattern` is empty or not a valid regex.
    pub fn compile(id: &str, pattern: &str, replacement: Option<&str>) -> Result<Self, CompileError> {
        if id.is_empty() {
            return Err(CompileError::InvalidId);
        }
        let pattern = compile_pattern(pattern)?;
        Ok(Self {
            id: id.to_string(),
            pattern,
            replacement: replacement.unwrap_or_default().to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replaces every non-overlapping match in `value`, left to right.
    ///
    /// Borrows `value` unchanged when nothing matched.
    pub fn apply<'v>(&self, value: &'v str) -> Cow<'v, str> {
        self.pattern.replace_all(value, self.replacement.as_str())
    }
}

impl fmt::Display for ReplaceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Id: [{}] Pattern: [{}] Replace: [{}]",
            self.id,
            self.source_pattern(),
            self.replacement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_rejects_empty_id() {
        assert!(matches!(
            ReplaceRule::compile("", r"\d", Some("x")),
            Err(CompileError::InvalidId)
        ));
    }

    #[test]
    fn compile_rejects_illegal_pattern() {
        assert!(matches!(
            ReplaceRule::compile("id", "(fi+", Some("x")),
            Err(CompileError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn missing_replacement_is_empty() {
        let rule = ReplaceRule::compile("punctuation", r"\p{P}", None).unwrap();
        assert_eq!(rule.replacement(), "");
        assert_eq!(rule.apply("There, is. punctuation!!"), "There is punctuation");
    }

    #[test]
    fn replaces_all_matches() {
        let rule = ReplaceRule::compile("asterisk", r"\*", Some("-")).unwrap();
        assert_eq!(rule.apply("4444*3333*3333*1111"), "4444-3333-3333-1111");
    }

    #[test]
    fn anchored_pattern_replaces_prefix_only() {
        let rule = ReplaceRule::compile("prefix", r"^\d{4}", Some("****")).unwrap();
        assert_eq!(rule.apply("3333-1111-2222-3333"), "****-1111-2222-3333");
    }

    #[test]
    fn capture_groups_are_expanded() {
        let rule = ReplaceRule::compile("swap", r"(\w+)@(\w+)", Some("$2 at $1")).unwrap();
        assert_eq!(rule.apply("user@host"), "host at user");
    }

    #[test]
    fn no_match_borrows_input() {
        let rule = ReplaceRule::compile("digits", r"\d+", Some("#")).unwrap();
        assert!(matches!(rule.apply("no digits here"), Cow::Borrowed(_)));
    }

    #[test]
    fn display_format() {
        let rule = ReplaceRule::compile("id", r"(\d+)", Some("?")).unwrap();
        assert_eq!(rule.to_string(), r"Id: [id] Pattern: [(\d+)] Replace: [?]");
    }
}
