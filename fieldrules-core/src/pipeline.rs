// fieldrules-core/src/pipeline.rs

//! `pipeline.rs`
//! Runs the filter and the transform engine over a document in sequence.
//!
//! A document is first handed to the [`AllowDisallowEngine`]; only accepted
//! documents are rewritten by the [`FieldTransformEngine`]. Rejected
//! documents are returned untouched.

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;

use crate::config::RuleSetConfig;
use crate::document::Document;
use crate::engines::allow_disallow::{AllowDisallowEngine, Decision};
use crate::engines::transform::FieldTransformEngine;
use crate::errors::TransformError;
use crate::markup::MarkupStripper;
use crate::report::BuildReport;
use crate::rules::builder::{RuleSet, RuleSetBuilder};

/// A filter engine and a transform engine applied one after the other.
///
/// Engines are immutable once built, so one pipeline can be shared between
/// threads processing separate documents.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    filter: AllowDisallowEngine,
    transform: FieldTransformEngine,
}

impl Pipeline {
    pub fn new(filter: AllowDisallowEngine, transform: FieldTransformEngine) -> Self {
        Self { filter, transform }
    }

    /// Engines for `rule_set` with the built-in HTML stripper.
    pub fn from_rule_set(rule_set: &RuleSet) -> Self {
        Self::new(rule_set.allow_disallow_engine(), rule_set.transform_engine())
    }

    /// Engines for `rule_set` with a host supplied markup stripper.
    pub fn with_stripper(rule_set: &RuleSet, stripper: Arc<dyn MarkupStripper>) -> Self {
        Self::new(rule_set.allow_disallow_engine(), rule_set.transform_engine_with(stripper))
    }

    /// Builds the rule set from `config` and wraps it in a pipeline.
    pub fn from_config(config: &RuleSetConfig) -> (Self, BuildReport) {
        let (rule_set, report) = RuleSetBuilder::build(config);
        (Self::from_rule_set(&rule_set), report)
    }

    pub fn filter(&self) -> &AllowDisallowEngine {
        &self.filter
    }

    pub fn transform(&self) -> &FieldTransformEngine {
        &self.transform
    }

    /// Decides on `doc` and, if accepted, rewrites its fields in place.
    ///
    /// An error concerns this document only; the pipeline stays usable for
    /// the next one.
    pub fn process<D: Document + ?Sized>(&self, doc: &mut D) -> Result<Decision, TransformError> {
        let decision = self.filter.decide(doc);
        if decision.is_accept() {
            self.transform.transform(doc)?;
        } else {
            debug!("Skipping transform for rejected document.");
        }
        Ok(decision)
    }
}

/// Loads a YAML configuration and runs every document through it, keeping
/// only the accepted ones. Documents that fail to transform are dropped
/// with a warning.
pub fn process_with_config_str<D: Document>(yaml: &str, docs: Vec<D>) -> Result<Vec<D>> {
    let config = RuleSetConfig::from_yaml_str(yaml)?;
    let (pipeline, _) = Pipeline::from_config(&config);
    let mut accepted = Vec::with_capacity(docs.len());
    for (index, mut doc) in docs.into_iter().enumerate() {
        match pipeline.process(&mut doc) {
            Ok(decision) if decision.is_accept() => accepted.push(doc),
            Ok(_) => {}
            Err(e) => warn!("Dropping document #{}: {}", index + 1, e),
        }
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InputDocument;

    const CONFIG: &str = r#"
disallow:
  - { name: content_type, value: spam }
rules:
  - { id: prefix, pattern: '^\d{4}', replace: '****' }
fields:
  - { name: card, value: prefix }
"#;

    fn doc(content_type: &str) -> InputDocument {
        let mut doc = InputDocument::new();
        doc.add_value("content_type", content_type);
        doc.add_value("card", "1234-5678");
        doc
    }

    #[test]
    fn rejected_documents_are_not_transformed() -> Result<()> {
        let config = RuleSetConfig::from_yaml_str(CONFIG)?;
        let (pipeline, report) = Pipeline::from_config(&config);
        assert!(report.is_clean());

        let mut rejected = doc("spam");
        assert_eq!(pipeline.process(&mut rejected)?, Decision::Reject);
        assert_eq!(rejected.text("card"), Some("1234-5678"));

        let mut accepted = doc("news");
        assert_eq!(pipeline.process(&mut accepted)?, Decision::Accept);
        assert_eq!(accepted.text("card"), Some("****-5678"));
        Ok(())
    }

    #[test]
    fn one_shot_processing_keeps_accepted_documents() -> Result<()> {
        let out = process_with_config_str(CONFIG, vec![doc("spam"), doc("news"), doc("blog")])?;
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|d| d.text("card") == Some("****-5678")));
        Ok(())
    }

    struct RejectsAngleBrackets;

    impl MarkupStripper for RejectsAngleBrackets {
        fn strip(&self, text: &str) -> Result<String> {
            anyhow::ensure!(!text.contains('<'), "unbalanced markup");
            Ok(text.to_string())
        }
    }

    #[test]
    fn a_failing_document_leaves_the_pipeline_usable() -> Result<()> {
        let config = RuleSetConfig::from_yaml_str("strip_markup:\n  - { name: field, value: body }\n")?;
        let (rule_set, _) = RuleSetBuilder::build(&config);
        let pipeline = Pipeline::with_stripper(&rule_set, Arc::new(RejectsAngleBrackets));

        let mut broken = InputDocument::new();
        broken.add_value("body", "<p");
        let err = pipeline.process(&mut broken).unwrap_err();
        assert!(matches!(err, TransformError::Strip { ref field, .. } if field == "body"));

        let mut fine = InputDocument::new();
        fine.add_value("body", "  plain   text ");
        assert_eq!(pipeline.process(&mut fine)?, Decision::Accept);
        assert_eq!(fine.text("body"), Some("plain text"));
        Ok(())
    }

    #[test]
    fn default_pipeline_accepts_and_leaves_values() -> Result<()> {
        let mut d = doc("spam");
        assert_eq!(Pipeline::default().process(&mut d)?, Decision::Accept);
        assert_eq!(d.text("card"), Some("1234-5678"));
        Ok(())
    }
}
