//! `fieldrules process`: run documents through the configured rules.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info, warn};
use std::fs;
use std::io::{self, BufWriter, Read, Write};

use fieldrules_core::{parse_documents, Decision, InputDocument, Pipeline, RuleSetConfig};

use crate::cli::ProcessCommand;
use crate::ui::output::{print_info_message, print_success_message, print_warn_message};

/// Counts for one `process` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Documents dropped because their transform failed.
    pub failed: usize,
}

impl ProcessStats {
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Processed {} documents: {} accepted, {} rejected",
            self.total, self.accepted, self.rejected
        );
        if self.failed > 0 {
            line.push_str(&format!(", {} failed", self.failed));
        }
        line.push('.');
        line
    }
}

/// Runs `docs` through `pipeline`, writing accepted documents to `writer`
/// as JSON lines. A document whose transform fails is logged, counted and
/// left out of the output.
pub fn process_documents<W: Write>(
    pipeline: &Pipeline,
    docs: Vec<InputDocument>,
    writer: &mut W,
) -> Result<ProcessStats> {
    let mut stats = ProcessStats::default();
    for (index, mut doc) in docs.into_iter().enumerate() {
        stats.total += 1;
        let decision = match pipeline.process(&mut doc) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Failed to process document #{}: {}", index + 1, e);
                stats.failed += 1;
                continue;
            }
        };
        match decision {
            Decision::Accept => {
                serde_json::to_writer(&mut *writer, &doc)
                    .with_context(|| format!("Failed to write document #{}", index + 1))?;
                writeln!(writer)?;
                stats.accepted += 1;
            }
            Decision::Reject => {
                debug!("Document #{} rejected.", index + 1);
                stats.rejected += 1;
            }
        }
    }
    Ok(stats)
}

fn read_input(cmd: &ProcessCommand) -> Result<String> {
    match &cmd.input {
        Some(path) => {
            info!("Reading documents from file: {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read input file {}", path.display()))
        }
        None => {
            info!("Reading documents from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read documents from stdin")?;
            Ok(buffer)
        }
    }
}

/// Runs the `process` command.
pub fn run_process(cmd: &ProcessCommand, quiet: bool) -> Result<()> {
    let config = RuleSetConfig::load_from_file(&cmd.config)?;
    let (pipeline, report) = Pipeline::from_config(&config);

    let input = read_input(cmd)?;
    let docs = parse_documents(&input).context("Failed to parse input documents")?;

    let stats = match &cmd.output {
        Some(path) => {
            info!("Writing accepted documents to file: {}", path.display());
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let stats = process_documents(&pipeline, docs, &mut writer)?;
            writer.flush()?;
            stats
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let stats = process_documents(&pipeline, docs, &mut writer)?;
            writer.flush()?;
            stats
        }
    };

    if !quiet {
        let stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        let mut err = stderr.lock();
        if let Some(path) = &cmd.output {
            print_info_message(
                &mut err,
                &format!("Wrote {} documents to {}", stats.accepted, path.display()),
                supports_color,
            )?;
        }
        if !report.is_clean() {
            print_warn_message(
                &mut err,
                &format!(
                    "{} configuration entries were skipped; run `fieldrules check` for details.",
                    report.len()
                ),
                supports_color,
            )?;
        }
        if stats.failed > 0 {
            print_warn_message(&mut err, &stats.summary(), supports_color)?;
        } else {
            print_success_message(&mut err, &stats.summary(), supports_color)?;
        }
    }
    Ok(())
}
