//! Message helpers for stderr/stdout output.

use std::io::{self, Write};

use crate::ui::theme::{styled, ThemeEntry};

fn print_prefixed<W: Write>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    entry: ThemeEntry,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer, "{} {}", styled(prefix, entry, supports_color), message)
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "info:", message, ThemeEntry::Info, supports_color)
}

pub fn print_success_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "ok:", message, ThemeEntry::Success, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "warning:", message, ThemeEntry::Warn, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_prefixed(writer, "error:", message, ThemeEntry::Error, supports_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_their_prefix() {
        let mut out = Vec::new();
        print_warn_message(&mut out, "2 entries skipped", false).unwrap();
        print_error_message(&mut out, "bad config", false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "warning: 2 entries skipped\nerror: bad config\n");
    }
}
