//! Build report: what the rule set builder skipped, and why.

use log::warn;
use std::fmt;
use thiserror::Error;

use crate::errors::CompileError;

/// Configuration section an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Allow,
    Disallow,
    Rules,
    Fields,
    StripMarkup,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Allow => "allow",
            Section::Disallow => "disallow",
            Section::Rules => "rules",
            Section::Fields => "fields",
            Section::StripMarkup => "strip_markup",
        };
        f.write_str(name)
    }
}

/// Why a configuration entry was dropped.
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("entry has no name")]
    MissingName,

    #[error("value is not text")]
    NotText,

    #[error("value is not a boolean")]
    NotABool,

    #[error("trimmed value is empty")]
    EmptyValue,

    #[error("section is not a list of name/value entries")]
    NotAList,

    #[error("rule definition is not a record")]
    NotARecord,

    #[error("rule has no text id")]
    MissingId,

    #[error("rule has no text pattern")]
    MissingPattern,

    #[error("rule has no text replace value")]
    MissingReplace,

    #[error("unknown rule id '{0}'")]
    UnknownRuleId(String),

    #[error("{0}")]
    Compile(#[from] CompileError),
}

/// A dropped entry with its origin.
#[derive(Debug)]
pub struct SkippedEntry {
    pub section: Section,
    pub entry: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.section, self.entry, self.reason)
    }
}

/// Everything the builder dropped. An empty report means the configuration
/// was used in full.
#[derive(Debug, Default)]
pub struct BuildReport {
    skipped: Vec<SkippedEntry>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a skipped entry and logs it at warn level.
    pub fn skip(&mut self, section: Section, entry: impl fmt::Display, reason: SkipReason) {
        let skipped = SkippedEntry { section, entry: entry.to_string(), reason };
        warn!("Skipping configuration entry {}", skipped);
        self.skipped.push(skipped);
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn in_section(&self, section: Section) -> impl Iterator<Item = &SkippedEntry> {
        self.skipped.iter().filter(move |s| s.section == section)
    }
}
