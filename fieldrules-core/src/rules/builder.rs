//! builder.rs - Turns a raw `RuleSetConfig` into a compiled `RuleSet`.
//!
//! Building never fails. Every entry that cannot be used is dropped, logged
//! at warn level and recorded in the returned [`BuildReport`], so a host can
//! decide for itself whether a partially usable configuration is acceptable.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, log_enabled, warn, Level};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{ConfigValue, NamedList, RuleEntry, RuleSetConfig};
use crate::engines::allow_disallow::{AllowDisallowEngine, AllowDisallowMode};
use crate::engines::transform::FieldTransformEngine;
use crate::markup::{HtmlStripper, MarkupStage, MarkupStripper, SpaceNormalizer};
use crate::report::{BuildReport, Section, SkipReason};
use crate::rules::chain::FieldRuleChain;
use crate::rules::match_rule::MatchRule;
use crate::rules::replace_rule::ReplaceRule;

/// Markup stripping settings taken from the `strip_markup` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripSettings {
    /// Fields to strip, in configuration order, without duplicates.
    pub fields: Vec<String>,
    /// Run whitespace normalization after stripping.
    pub normalize: bool,
    /// Let normalization turn no-break spaces into plain spaces.
    pub fold_no_break_space: bool,
}

impl Default for StripSettings {
    fn default() -> Self {
        Self { fields: Vec::new(), normalize: true, fold_no_break_space: true }
    }
}

impl StripSettings {
    pub fn is_enabled(&self) -> bool {
        !self.fields.is_empty()
    }

    /// The configured normalizer, if normalization is on.
    pub fn normalizer(&self) -> Option<SpaceNormalizer> {
        self.normalize
            .then_some(SpaceNormalizer { fold_no_break_space: self.fold_no_break_space })
    }

    /// A markup stage using `stripper` with these settings.
    pub fn stage_with(&self, stripper: Arc<dyn MarkupStripper>) -> MarkupStage {
        MarkupStage::new(stripper, self.normalizer())
    }

    /// A markup stage using the built-in HTML stripper.
    pub fn stage(&self) -> MarkupStage {
        self.stage_with(Arc::new(HtmlStripper))
    }
}

/// The compiled, immutable result of a build.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    mode: AllowDisallowMode,
    match_rules: Vec<MatchRule>,
    replace_rules: Vec<Arc<ReplaceRule>>,
    chains: Vec<FieldRuleChain>,
    strip: StripSettings,
    unique_key: Option<String>,
}

impl RuleSet {
    pub fn mode(&self) -> AllowDisallowMode {
        self.mode
    }

    pub fn match_rules(&self) -> &[MatchRule] {
        &self.match_rules
    }

    /// Replace rules in definition order. A redefined id keeps the position
    /// of its first definition.
    pub fn replace_rules(&self) -> &[Arc<ReplaceRule>] {
        &self.replace_rules
    }

    pub fn replace_rule(&self, id: &str) -> Option<&Arc<ReplaceRule>> {
        self.replace_rules.iter().find(|r| r.id() == id)
    }

    pub fn chains(&self) -> &[FieldRuleChain] {
        &self.chains
    }

    pub fn chain(&self, field: &str) -> Option<&FieldRuleChain> {
        self.chains.iter().find(|c| c.field_name() == field)
    }

    pub fn strip_settings(&self) -> &StripSettings {
        &self.strip
    }

    pub fn unique_key(&self) -> Option<&str> {
        self.unique_key.as_deref()
    }

    /// A filter engine for this rule set.
    pub fn allow_disallow_engine(&self) -> AllowDisallowEngine {
        let engine = AllowDisallowEngine::new(self.mode, self.match_rules.clone());
        match &self.unique_key {
            Some(key) => engine.with_unique_key(key.clone()),
            None => engine,
        }
    }

    /// A transform engine for this rule set using the built-in HTML stripper.
    pub fn transform_engine(&self) -> FieldTransformEngine {
        self.transform_engine_with(Arc::new(HtmlStripper))
    }

    /// A transform engine for this rule set using a host supplied stripper.
    pub fn transform_engine_with(&self, stripper: Arc<dyn MarkupStripper>) -> FieldTransformEngine {
        FieldTransformEngine::new(self.chains.clone())
            .with_markup(self.strip.fields.iter().cloned(), self.strip.stage_with(stripper))
    }
}

fn text(value: &Option<ConfigValue>) -> Option<&str> {
    value.as_ref().and_then(ConfigValue::as_text)
}

/// Validates and compiles rule configuration, one section at a time.
///
/// The section methods can be used on their own; [`RuleSetBuilder::build`]
/// runs all of them over a whole [`RuleSetConfig`].
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    report: BuildReport,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from `config`, returning it with the build report.
    pub fn build(config: &RuleSetConfig) -> (RuleSet, BuildReport) {
        let mut builder = Self::new();
        let rule_set = builder.build_rule_set(config);
        (rule_set, builder.finish())
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Consumes the builder, returning what was skipped.
    pub fn finish(self) -> BuildReport {
        self.report
    }

    fn build_rule_set(&mut self, config: &RuleSetConfig) -> RuleSet {
        let (mode, match_rules) = self.resolve_mode(config);
        let replace_rules = self.replace_rules(&config.rules);
        let chains = match self.section_list(Section::Fields, config.fields.as_ref()) {
            Some(fields) => self.field_chains(fields, &replace_rules),
            None => {
                if !replace_rules.is_empty() {
                    warn!(
                        "{} replace rules defined but no fields section binds them; no field will be rewritten.",
                        replace_rules.len()
                    );
                }
                Vec::new()
            }
        };
        let strip = match self.section_list(Section::StripMarkup, config.strip_markup.as_ref()) {
            Some(list) => self.strip_settings(list),
            None => StripSettings::default(),
        };
        let unique_key = config
            .unique_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        let rule_set = RuleSet { mode, match_rules, replace_rules, chains, strip, unique_key };
        info!(
            "Built rule set: mode {}, {} match rules, {} replace rules, {} field chains, {} markup fields ({} entries skipped).",
            rule_set.mode,
            rule_set.match_rules.len(),
            rule_set.replace_rules.len(),
            rule_set.chains.len(),
            rule_set.strip.fields.len(),
            self.report.len()
        );
        if log_enabled!(Level::Debug) {
            for chain in &rule_set.chains {
                debug!("Field chain {}", chain);
            }
        }
        rule_set
    }

    /// Returns the section as a named list, recording it as skipped if it
    /// is present with any other shape.
    fn section_list<'c>(&mut self, section: Section, value: Option<&'c ConfigValue>) -> Option<&'c NamedList> {
        let value = value?;
        match value.as_list() {
            Some(list) => Some(list),
            None => {
                self.report.skip(section, value, SkipReason::NotAList);
                None
            }
        }
    }

    /// Picks the filter mode: `allow` wins over `disallow`; neither means
    /// [`AllowDisallowMode::Unknown`].
    pub fn resolve_mode(&mut self, config: &RuleSetConfig) -> (AllowDisallowMode, Vec<MatchRule>) {
        let allow = self.section_list(Section::Allow, config.allow.as_ref());
        let disallow = self.section_list(Section::Disallow, config.disallow.as_ref());
        match (allow, disallow) {
            (Some(allow), disallow) => {
                if disallow.is_some() {
                    warn!("Both allow and disallow rules configured; the disallow section is ignored.");
                }
                info!("Allow/disallow engine running in allow mode.");
                (AllowDisallowMode::Allow, self.match_rules(Section::Allow, allow))
            }
            (None, Some(disallow)) => {
                info!("Allow/disallow engine running in disallow mode.");
                (AllowDisallowMode::Disallow, self.match_rules(Section::Disallow, disallow))
            }
            (None, None) => {
                warn!("No allow or disallow rules configured; documents will not be filtered.");
                (AllowDisallowMode::Unknown, Vec::new())
            }
        }
    }

    /// Compiles the field/pattern pairs of an allow or disallow list.
    pub fn match_rules(&mut self, section: Section, list: &NamedList) -> Vec<MatchRule> {
        let mut rules = Vec::new();
        for entry in list {
            let Some(field) = entry.name.as_deref().filter(|n| !n.trim().is_empty()) else {
                self.report.skip(section, entry, SkipReason::MissingName);
                continue;
            };
            let Some(pattern) = entry.value.as_text() else {
                self.report.skip(section, entry, SkipReason::NotText);
                continue;
            };
            let pattern = pattern.trim();
            if pattern.is_empty() {
                self.report.skip(section, entry, SkipReason::EmptyValue);
                continue;
            }
            match MatchRule::compile(field, pattern) {
                Ok(rule) => {
                    debug!("Added FieldMatchRule {}", rule);
                    rules.push(rule);
                }
                Err(e) => self.report.skip(section, entry, e.into()),
            }
        }
        rules
    }

    /// Compiles the `rules` section. A later definition of an id replaces
    /// the earlier one in place.
    pub fn replace_rules(&mut self, entries: &[RuleEntry]) -> Vec<Arc<ReplaceRule>> {
        let mut rules: Vec<Arc<ReplaceRule>> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for entry in entries {
            let definition = match entry {
                RuleEntry::Definition(definition) => definition,
                RuleEntry::Malformed(value) => {
                    self.report.skip(Section::Rules, format!("{:?}", value), SkipReason::NotARecord);
                    continue;
                }
            };
            let Some(id) = text(&definition.id) else {
                self.report.skip(Section::Rules, definition, SkipReason::MissingId);
                continue;
            };
            let Some(pattern) = text(&definition.pattern) else {
                self.report.skip(Section::Rules, definition, SkipReason::MissingPattern);
                continue;
            };
            let Some(replace) = text(&definition.replace) else {
                self.report.skip(Section::Rules, definition, SkipReason::MissingReplace);
                continue;
            };
            let rule = match ReplaceRule::compile(id, pattern, Some(replace)) {
                Ok(rule) => Arc::new(rule),
                Err(e) => {
                    self.report.skip(Section::Rules, definition, e.into());
                    continue;
                }
            };
            debug!("Added pattern replace rule {}", rule);
            match positions.get(id).copied() {
                Some(i) => {
                    warn!("Rule id '{}' is defined more than once; the later definition is used.", id);
                    rules[i] = rule;
                }
                None => {
                    positions.insert(id.to_string(), rules.len());
                    rules.push(rule);
                }
            }
        }
        rules
    }

    /// Binds rules to fields. One chain per distinct field, ordered by first
    /// appearance; rules within a chain follow binding order.
    pub fn field_chains(&mut self, fields: &NamedList, rules: &[Arc<ReplaceRule>]) -> Vec<FieldRuleChain> {
        let lookup: HashMap<&str, &Arc<ReplaceRule>> = rules.iter().map(|r| (r.id(), r)).collect();
        let mut chains: Vec<FieldRuleChain> = Vec::new();
        for entry in fields {
            let Some(field) = entry.name.as_deref().filter(|n| !n.trim().is_empty()) else {
                self.report.skip(Section::Fields, entry, SkipReason::MissingName);
                continue;
            };
            let Some(id) = entry.value.as_text() else {
                self.report.skip(Section::Fields, entry, SkipReason::NotText);
                continue;
            };
            let index = match chains.iter().position(|c| c.field_name() == field) {
                Some(i) => i,
                None => match FieldRuleChain::new(field) {
                    Ok(chain) => {
                        chains.push(chain);
                        chains.len() - 1
                    }
                    Err(e) => {
                        self.report.skip(Section::Fields, entry, e.into());
                        continue;
                    }
                },
            };
            match lookup.get(id) {
                Some(rule) => {
                    debug!("Bound rule '{}' to field '{}'", id, field);
                    chains[index].add(Arc::clone(rule));
                }
                None => self.report.skip(Section::Fields, entry, SkipReason::UnknownRuleId(id.to_string())),
            }
        }
        chains
    }

    /// Reads the `strip_markup` settings.
    pub fn strip_settings(&mut self, list: &NamedList) -> StripSettings {
        let mut settings = StripSettings::default();
        for entry in list {
            match entry.name.as_deref() {
                Some("field") => match entry.value.as_text().map(str::trim) {
                    Some("") => self.report.skip(Section::StripMarkup, entry, SkipReason::EmptyValue),
                    Some(field) => {
                        if !settings.fields.iter().any(|f| f == field) {
                            settings.fields.push(field.to_string());
                        }
                    }
                    None => self.report.skip(Section::StripMarkup, entry, SkipReason::NotText),
                },
                Some("normalize") => match entry.value.as_bool() {
                    Some(b) => settings.normalize = b,
                    None => self.report.skip(Section::StripMarkup, entry, SkipReason::NotABool),
                },
                Some("fold_no_break_space") => match entry.value.as_bool() {
                    Some(b) => settings.fold_no_break_space = b,
                    None => self.report.skip(Section::StripMarkup, entry, SkipReason::NotABool),
                },
                _ => debug!("Ignoring markup setting {}", entry),
            }
        }
        settings
    }
}
