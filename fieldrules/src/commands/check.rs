//! `fieldrules check`: build a rule configuration and summarize the result.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use fieldrules_core::{BuildReport, RuleSet, RuleSetBuilder, RuleSetConfig};

use crate::cli::CheckCommand;
use crate::errors::CliError;
use crate::ui::theme::{styled, ThemeEntry};

/// Everything `check` reports about a compiled rule set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSummary {
    pub config: String,
    pub mode: String,
    pub unique_key: Option<String>,
    pub match_rules: Vec<String>,
    pub replace_rules: Vec<String>,
    pub chains: Vec<String>,
    pub strip_fields: Vec<String>,
    pub normalize: bool,
    pub fold_no_break_space: bool,
    pub skipped: Vec<String>,
}

impl CheckSummary {
    pub fn new(config: &Path, rule_set: &RuleSet, report: &BuildReport) -> Self {
        let strip = rule_set.strip_settings();
        Self {
            config: config.display().to_string(),
            mode: rule_set.mode().to_string(),
            unique_key: rule_set.unique_key().map(str::to_string),
            match_rules: rule_set.match_rules().iter().map(ToString::to_string).collect(),
            replace_rules: rule_set.replace_rules().iter().map(ToString::to_string).collect(),
            chains: rule_set.chains().iter().map(ToString::to_string).collect(),
            strip_fields: strip.fields.clone(),
            normalize: strip.normalize,
            fold_no_break_space: strip.fold_no_break_space,
            skipped: report.skipped().iter().map(ToString::to_string).collect(),
        }
    }
}

fn print_section<W: Write>(
    writer: &mut W,
    title: &str,
    items: &[String],
    entry: ThemeEntry,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(
        writer,
        "{} ({})",
        styled(title, ThemeEntry::Header, supports_color),
        styled(items.len(), ThemeEntry::Count, supports_color)
    )?;
    for item in items {
        writeln!(writer, "  {}", styled(item, entry, supports_color))?;
    }
    Ok(())
}

/// Writes the human readable form of `summary`.
pub fn print_summary<W: Write>(summary: &CheckSummary, writer: &mut W, supports_color: bool) -> io::Result<()> {
    writeln!(
        writer,
        "{} {}",
        styled("Rule configuration:", ThemeEntry::Header, supports_color),
        summary.config
    )?;
    writeln!(writer, "Mode: {}", styled(&summary.mode, ThemeEntry::RuleName, supports_color))?;
    if let Some(key) = &summary.unique_key {
        writeln!(writer, "Unique key: {}", key)?;
    }
    print_section(writer, "Match rules", &summary.match_rules, ThemeEntry::RuleName, supports_color)?;
    print_section(writer, "Replace rules", &summary.replace_rules, ThemeEntry::RuleName, supports_color)?;
    print_section(writer, "Field chains", &summary.chains, ThemeEntry::RuleName, supports_color)?;
    print_section(writer, "Markup fields", &summary.strip_fields, ThemeEntry::RuleName, supports_color)?;
    if !summary.strip_fields.is_empty() {
        writeln!(
            writer,
            "  normalize: {}, fold no-break spaces: {}",
            summary.normalize, summary.fold_no_break_space
        )?;
    }
    print_section(writer, "Skipped entries", &summary.skipped, ThemeEntry::Warn, supports_color)
}

/// Runs the `check` command.
pub fn run_check(cmd: &CheckCommand) -> Result<()> {
    let config = RuleSetConfig::load_from_file(&cmd.config)?;
    let (rule_set, report) = RuleSetBuilder::build(&config);
    let summary = CheckSummary::new(&cmd.config, &rule_set, &report);

    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();
    if cmd.json {
        serde_json::to_writer_pretty(&mut writer, &summary).context("Failed to write JSON summary")?;
        writeln!(writer)?;
    } else {
        print_summary(&summary, &mut writer, supports_color)?;
    }
    writer.flush()?;

    if cmd.strict && !report.is_clean() {
        return Err(CliError::StrictCheckFailed(report.len()).into());
    }
    info!("Check of {} completed.", cmd.config.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_for(yaml: &str) -> CheckSummary {
        let config = RuleSetConfig::from_yaml_str(yaml).unwrap();
        let (rule_set, report) = RuleSetBuilder::build(&config);
        CheckSummary::new(Path::new("rules.yaml"), &rule_set, &report)
    }

    #[test]
    fn summary_lists_rules_and_skips() {
        let summary = summary_for(
            r#"
allow:
  - { name: content_type, value: default }
  - { name: count, value: 100 }
rules:
  - { id: prefix, pattern: '^\d{4}', replace: '****' }
fields:
  - { name: card, value: prefix }
"#,
        );
        assert_eq!(summary.mode, "allow");
        assert_eq!(summary.match_rules, vec!["content_type =~ m/default/"]);
        assert_eq!(summary.replace_rules, vec![r"Id: [prefix] Pattern: [^\d{4}] Replace: [****]"]);
        assert_eq!(summary.skipped, vec!["[allow] count=100: value is not text"]);
    }

    #[test]
    fn plain_summary_output() {
        let summary = summary_for("strip_markup:\n  - { name: field, value: content }\n");
        let mut out = Vec::new();
        print_summary(&summary, &mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Mode: unknown"));
        assert!(text.contains("Markup fields (1)\n  content\n"));
        assert!(text.contains("Skipped entries (0)"));
    }
}
