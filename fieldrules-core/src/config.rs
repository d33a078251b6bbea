//! Configuration management for `fieldrules-core`.
//!
//! This module defines the raw, loosely typed rule configuration as it comes
//! out of a YAML file. Nothing here is validated beyond YAML syntax: values
//! that have the wrong shape are kept as [`ConfigValue::Other`] so that the
//! rule set builder can skip them with a reason instead of failing the load.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A loosely typed configuration value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    List(NamedList),
    Other(serde_yml::Value),
}

impl Default for ConfigValue {
    fn default() -> Self {
        ConfigValue::Other(serde_yml::Value::Null)
    }
}

impl ConfigValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&NamedList> {
        match self {
            ConfigValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Other(serde_yml::Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Text(s) => write!(f, "\"{}\"", s),
            ConfigValue::List(l) => write!(f, "{}", l),
            ConfigValue::Other(serde_yml::Value::Null) => write!(f, "null"),
            ConfigValue::Other(serde_yml::Value::Bool(b)) => write!(f, "{}", b),
            ConfigValue::Other(serde_yml::Value::Number(n)) => write!(f, "{}", n),
            ConfigValue::Other(_) => write!(f, "<complex value>"),
        }
    }
}

/// One `name: value` pair of a [`NamedList`]. Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NamedEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: ConfigValue,
}

impl NamedEntry {
    pub fn new(name: impl Into<String>, value: ConfigValue) -> Self {
        Self { name: Some(name.into()), value }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ConfigValue::Text(value.into()))
    }
}

impl fmt::Display for NamedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}={}", name, self.value),
            None => write!(f, "<unnamed>={}", self.value),
        }
    }
}

/// An ordered list of name/value pairs. Names may repeat; order is kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct NamedList {
    entries: Vec<NamedEntry>,
}

impl NamedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, builder style.
    pub fn with(mut self, entry: NamedEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn push(&mut self, entry: NamedEntry) {
        self.entries.push(entry);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All values stored under `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigValue> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.name.as_deref() == Some(name))
            .map(|e| &e.value)
    }
}

impl<'a> IntoIterator for &'a NamedList {
    type Item = &'a NamedEntry;
    type IntoIter = std::slice::Iter<'a, NamedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<NamedEntry> for NamedList {
    fn from_iter<I: IntoIterator<Item = NamedEntry>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl fmt::Display for NamedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry)?;
        }
        write!(f, "]")
    }
}

/// A raw pattern replacement rule definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleDefinition {
    pub id: Option<ConfigValue>,
    pub pattern: Option<ConfigValue>,
    pub replace: Option<ConfigValue>,
}

impl RuleDefinition {
    pub fn new(id: &str, pattern: &str, replace: &str) -> Self {
        Self {
            id: Some(ConfigValue::Text(id.to_string())),
            pattern: Some(ConfigValue::Text(pattern.to_string())),
            replace: Some(ConfigValue::Text(replace.to_string())),
        }
    }
}

impl fmt::Display for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<ConfigValue>| match v {
            Some(v) => v.to_string(),
            None => "<missing>".to_string(),
        };
        write!(
            f,
            "{{id: {}, pattern: {}, replace: {}}}",
            show(&self.id),
            show(&self.pattern),
            show(&self.replace)
        )
    }
}

/// An element of the `rules` sequence. Anything that is not a mapping is
/// kept as `Malformed` and skipped by the builder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Definition(RuleDefinition),
    Malformed(serde_yml::Value),
}

/// Represents the top-level rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Name of the document field holding its unique key, used in rejection messages.
    pub unique_key: Option<String>,
    /// Field/pattern pairs; a document is indexed only if one matches.
    pub allow: Option<ConfigValue>,
    /// Field/pattern pairs; a document is dropped if one matches.
    pub disallow: Option<ConfigValue>,
    /// Pattern replacement rule definitions.
    pub rules: Vec<RuleEntry>,
    /// Field name to rule id bindings.
    pub fields: Option<ConfigValue>,
    /// Markup stripping settings.
    pub strip_markup: Option<ConfigValue>,
}

impl RuleSetConfig {
    /// Loads a rule configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading rule configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!(
            "Loaded {} rule definitions from file {}.",
            config.rules.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses a rule configuration from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            debug!("Empty rule configuration, using defaults.");
            return Ok(Self::default());
        }
        let config: RuleSetConfig =
            serde_yml::from_str(text).context("Invalid rule configuration YAML")?;
        Ok(config)
    }
}
