//! Markup stripping ahead of pattern replacement.
//!
//! The stripper is a collaborator behind the [`MarkupStripper`] trait so a
//! host can plug in its own HTML handling. [`HtmlStripper`] is the built-in
//! implementation. Whitespace normalization is a separate, optional
//! post-step ([`SpaceNormalizer`]) because tag removal leaves runs of
//! spaces behind.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Removes markup from a text value.
pub trait MarkupStripper: Send + Sync {
    fn strip(&self, text: &str) -> Result<String>;
}

static BLOCK_ELEMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("block element pattern is valid")
});

static COMMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));

static TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)</?[A-Za-z!?][^>]*>").expect("tag pattern is valid"));

static ENTITIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]{2,8});").expect("entity pattern is valid")
});

static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("blank run pattern is valid"));

const NO_BREAK_SPACE: char = '\u{00A0}';

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(NO_BREAK_SPACE),
        "copy" => Some('\u{00A9}'),
        "reg" => Some('\u{00AE}'),
        "hellip" => Some('\u{2026}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        _ => None,
    }
}

/// Built-in HTML stripper.
///
/// `<script>` and `<style>` elements and comments are removed with their
/// content; every other tag becomes a single space. Character references
/// are decoded; unknown named entities are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStripper;

impl HtmlStripper {
    pub fn strip_str(&self, text: &str) -> String {
        let text = BLOCK_ELEMENTS.replace_all(text, " ");
        let text = COMMENTS.replace_all(&text, " ");
        let text = TAGS.replace_all(&text, " ");
        ENTITIES
            .replace_all(&text, |caps: &Captures| match decode_entity(&caps[1]) {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl MarkupStripper for HtmlStripper {
    fn strip(&self, text: &str) -> Result<String> {
        Ok(self.strip_str(text))
    }
}

/// Trims a value and collapses runs of blanks into a single space.
///
/// U+00A0 is never trimmed on its own; it only disappears from the ends of
/// a value once it has been folded into a plain space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceNormalizer {
    /// Turn U+00A0 into a plain space before collapsing.
    pub fold_no_break_space: bool,
}

impl Default for SpaceNormalizer {
    fn default() -> Self {
        Self { fold_no_break_space: true }
    }
}

impl SpaceNormalizer {
    pub fn normalize(&self, text: &str) -> String {
        let folded = if self.fold_no_break_space && text.contains(NO_BREAK_SPACE) {
            Cow::Owned(text.replace(NO_BREAK_SPACE, " "))
        } else {
            Cow::Borrowed(text)
        };
        let trimmed = folded.trim_matches(|c: char| c.is_whitespace() && c != NO_BREAK_SPACE);
        BLANK_RUNS.replace_all(trimmed, " ").into_owned()
    }
}

/// The stripping stage as configured for a transform engine.
#[derive(Clone)]
pub struct MarkupStage {
    stripper: Arc<dyn MarkupStripper>,
    normalizer: Option<SpaceNormalizer>,
}

impl MarkupStage {
    pub fn new(stripper: Arc<dyn MarkupStripper>, normalizer: Option<SpaceNormalizer>) -> Self {
        Self { stripper, normalizer }
    }

    /// HTML stripping followed by default normalization.
    pub fn html() -> Self {
        Self::new(Arc::new(HtmlStripper), Some(SpaceNormalizer::default()))
    }

    pub fn normalizer(&self) -> Option<SpaceNormalizer> {
        self.normalizer
    }

    pub fn process(&self, text: &str) -> Result<String> {
        let stripped = self.stripper.strip(text)?;
        Ok(match &self.normalizer {
            Some(normalizer) => normalizer.normalize(&stripped),
            None => stripped,
        })
    }
}

impl Default for MarkupStage {
    fn default() -> Self {
        Self::html()
    }
}

impl fmt::Debug for MarkupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupStage")
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}
