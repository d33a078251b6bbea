// fieldrules-core/src/engines/transform.rs
//! Field value rewriting: markup stripping followed by pattern replacement.
//!
//! Each configured field gets a plan saying whether its text values are
//! stripped and which replacement chain runs afterwards. Fields with a chain
//! are processed in configuration order, followed by fields that are only
//! stripped.
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::document::{Document, FieldValue};
use crate::errors::TransformError;
use crate::markup::MarkupStage;
use crate::rules::chain::FieldRuleChain;

#[derive(Debug, Clone)]
struct FieldPlan {
    field: String,
    strip: bool,
    chain: Option<FieldRuleChain>,
}

/// Rewrites the text values of configured fields in place.
///
/// Values of a stripped field go through the [`MarkupStage`] first, then
/// through the field's [`FieldRuleChain`]. Boosts and non-text values are
/// left as they are.
#[derive(Debug, Clone, Default)]
pub struct FieldTransformEngine {
    plans: Vec<FieldPlan>,
    markup: MarkupStage,
}

impl FieldTransformEngine {
    /// An engine applying `chains` without any markup stripping.
    pub fn new(chains: Vec<FieldRuleChain>) -> Self {
        let plans = chains
            .into_iter()
            .map(|chain| FieldPlan {
                field: chain.field_name().to_string(),
                strip: false,
                chain: Some(chain),
            })
            .collect();
        Self { plans, markup: MarkupStage::default() }
    }

    /// Strips markup from `fields` with `stage` before any replacement runs.
    pub fn with_markup<I, S>(mut self, fields: I, stage: MarkupStage) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            match self.plans.iter_mut().find(|p| p.field == field) {
                Some(plan) => plan.strip = true,
                None => self.plans.push(FieldPlan { field, strip: true, chain: None }),
            }
        }
        self.markup = stage;
        self
    }

    pub fn chains(&self) -> impl Iterator<Item = &FieldRuleChain> {
        self.plans.iter().filter_map(|p| p.chain.as_ref())
    }

    pub fn strip_fields(&self) -> impl Iterator<Item = &str> {
        self.plans.iter().filter(|p| p.strip).map(|p| p.field.as_str())
    }

    /// True if no field is configured at all.
    pub fn is_noop(&self) -> bool {
        self.plans.is_empty()
    }

    /// Rewrites the values of every configured field present in `doc`.
    ///
    /// Values keep their order; non-text values pass through unchanged and
    /// the field's boost is preserved by [`Document::replace_values`].
    pub fn transform<D: Document + ?Sized>(&self, doc: &mut D) -> Result<(), TransformError> {
        for plan in &self.plans {
            let new_values = match doc.values(&plan.field) {
                Some(values) => {
                    debug!("Processing field: {}", plan.field);
                    values
                        .iter()
                        .map(|value| self.transform_value(plan, value))
                        .collect::<Result<Vec<_>, _>>()?
                }
                None => continue,
            };
            doc.replace_values(&plan.field, new_values);
        }
        Ok(())
    }

    fn transform_value(&self, plan: &FieldPlan, value: &FieldValue) -> Result<FieldValue, TransformError> {
        let Some(text) = value.as_text() else {
            return Ok(value.clone());
        };
        let stripped;
        let text = if plan.strip {
            stripped = self.markup.process(text).map_err(|source| TransformError::Strip {
                field: plan.field.clone(),
                source,
            })?;
            stripped.as_str()
        } else {
            text
        };
        Ok(FieldValue::Text(match &plan.chain {
            Some(chain) => chain.apply(text),
            None => text.to_string(),
        }))
    }
}
