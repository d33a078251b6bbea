// fieldrules/tests/cli_integration_tests.rs
//! Command-line integration tests for the `fieldrules` binary.
//!
//! The binary runs with stdout and stderr captured, so no color codes are
//! emitted and output can be compared as plain text. `tempfile` provides the
//! configuration, input and output files.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

const CONFIG: &str = r#"
unique_key: id
disallow:
  - { name: content_type, value: '^person$' }
rules:
  - { id: prefix, pattern: '^\d{4}', replace: '****' }
  - { id: punctuation, pattern: '\p{P}', replace: '' }
fields:
  - { name: card, value: prefix }
  - { name: comment, value: punctuation }
strip_markup:
  - { name: field, value: content }
"#;

const DOCUMENTS: &str = r#"{"id": "1", "content_type": "news", "card": "3333-1111-2222-3333", "content": "<P>Content</P> <em>with</em> markup"}
{"id": "2", "content_type": "person", "card": "4444-1111"}
{"id": "3", "content_type": "default", "comment": {"values": ["There, is. punctuation!!"], "boost": 2.0}}
"#;

fn temp_file(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

fn fieldrules() -> Command {
    let mut cmd = Command::cargo_bin("fieldrules").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("FIELDRULES_CONFIG");
    cmd
}

#[test]
fn test_no_arguments_prints_help() {
    fieldrules()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_process_stdin_to_stdout() -> Result<()> {
    let config = temp_file(CONFIG)?;
    let expected = concat!(
        r#"{"id":"1","content_type":"news","card":"****-1111-2222-3333","content":"Content with markup"}"#,
        "\n",
        r#"{"id":"3","content_type":"default","comment":{"values":["There is punctuation"],"boost":2.0}}"#,
        "\n",
    );
    fieldrules()
        .args(["process", "--config"])
        .arg(config.path())
        .write_stdin(DOCUMENTS)
        .assert()
        .success()
        .stdout(expected)
        .stderr(predicate::str::contains("Processed 3 documents: 2 accepted, 1 rejected."));
    Ok(())
}

#[test]
fn test_process_file_to_file() -> Result<()> {
    let config = temp_file(CONFIG)?;
    let input = temp_file(r#"[{"id": "9", "card": "1234-5678"}]"#)?;
    let dir = tempdir()?;
    let output = dir.path().join("out.jsonl");

    fieldrules()
        .args(["--quiet", "process", "--config"])
        .arg(config.path())
        .arg("--input")
        .arg(input.path())
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout("")
        .stderr("");

    assert_eq!(fs::read_to_string(&output)?, "{\"id\":\"9\",\"card\":\"****-5678\"}\n");
    Ok(())
}

#[test]
fn test_rejections_are_logged_with_unique_key() -> Result<()> {
    let config = temp_file(CONFIG)?;
    fieldrules()
        .env("RUST_LOG", "info")
        .args(["process", "--config"])
        .arg(config.path())
        .write_stdin(DOCUMENTS)
        .assert()
        .success()
        .stderr(predicate::str::contains("Document [2] rejected"));
    Ok(())
}

#[test]
fn test_process_invalid_json_fails() -> Result<()> {
    let config = temp_file(CONFIG)?;
    fieldrules()
        .args(["process", "--config"])
        .arg(config.path())
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse input documents"));
    Ok(())
}

#[test]
fn test_missing_config_fails() {
    fieldrules()
        .args(["check", "--config", "/no/such/rules.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file /no/such/rules.yaml"));
}

#[test]
fn test_check_prints_summary() -> Result<()> {
    let config = temp_file(CONFIG)?;
    fieldrules()
        .args(["check", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: disallow"))
        .stdout(predicate::str::contains("Field chains (2)"))
        .stdout(predicate::str::contains("card: [Id: [prefix]"))
        .stdout(predicate::str::contains("Skipped entries (0)"));
    Ok(())
}

#[test]
fn test_check_strict_fails_on_skipped_entries() -> Result<()> {
    let config = temp_file(
        r#"
allow:
  - { name: content_type, value: default }
  - { name: content_type, value: '(fi+' }
"#,
    )?;
    fieldrules()
        .args(["check", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped entries (1)"));

    fieldrules()
        .args(["check", "--strict", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 configuration entries were skipped (--strict)"));
    Ok(())
}

#[test]
fn test_check_json_output() -> Result<()> {
    let config = temp_file(CONFIG)?;
    let output = fieldrules()
        .args(["check", "--json", "--config"])
        .arg(config.path())
        .output()?;
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(summary["mode"], "disallow");
    assert_eq!(summary["unique_key"], "id");
    assert_eq!(summary["strip_fields"][0], "content");
    assert_eq!(summary["skipped"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[test]
fn test_config_from_environment() -> Result<()> {
    let config = temp_file(CONFIG)?;
    Command::cargo_bin("fieldrules")?
        .env_remove("RUST_LOG")
        .env("FIELDRULES_CONFIG", config.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: disallow"));
    Ok(())
}

#[test]
fn test_process_reports_output_file() -> Result<()> {
    let config = temp_file(CONFIG)?;
    let dir = tempdir()?;
    let output = dir.path().join("out.jsonl");
    fieldrules()
        .args(["process", "--config"])
        .arg(config.path())
        .arg("--output")
        .arg(&output)
        .write_stdin(DOCUMENTS)
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("info: Wrote 2 documents to"))
        .stderr(predicate::str::contains("ok: Processed 3 documents: 2 accepted, 1 rejected."));
    Ok(())
}
