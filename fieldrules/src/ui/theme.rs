//! Colors used for the CLI's human readable output.
//!
//! Each logical part of the output maps to one ANSI foreground color.
//! Color is only applied when the destination is a terminal.

use owo_colors::{AnsiColors, OwoColorize};
use std::fmt::Display;

/// The different logical parts of the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeEntry {
    /// Section titles.
    Header,
    /// Successful outcome messages.
    Success,
    /// General informational messages.
    Info,
    /// Warnings, including skipped configuration entries.
    Warn,
    /// Errors.
    Error,
    /// Rule and field names in summaries.
    RuleName,
    /// Counts in summaries.
    Count,
}

impl ThemeEntry {
    pub fn color(self) -> AnsiColors {
        match self {
            ThemeEntry::Header => AnsiColors::BrightWhite,
            ThemeEntry::Success => AnsiColors::Green,
            ThemeEntry::Info => AnsiColors::Cyan,
            ThemeEntry::Warn => AnsiColors::Yellow,
            ThemeEntry::Error => AnsiColors::Red,
            ThemeEntry::RuleName => AnsiColors::Magenta,
            ThemeEntry::Count => AnsiColors::BrightBlue,
        }
    }
}

/// Renders `text` in the color of `entry`, or plain when color is off.
pub fn styled<T: Display>(text: T, entry: ThemeEntry, supports_color: bool) -> String {
    if supports_color {
        text.color(entry.color()).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_when_color_is_off() {
        assert_eq!(styled("allow", ThemeEntry::RuleName, false), "allow");
    }

    #[test]
    fn ansi_codes_when_color_is_on() {
        let s = styled("oops", ThemeEntry::Error, true);
        assert!(s.contains("oops"));
        assert!(s.starts_with("\u{1b}["));
    }
}
