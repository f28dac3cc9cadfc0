//! Terminal status output for the CLI.
//!
//! Messages go to stderr so that stdout stays clean for BibTeX or JSON.
//! Colors are only used when stderr is a terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;
use std::io::IsTerminal;

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
    }
}

/// Format a status line, colored when `color` is set.
pub fn format_status(status: Status, msg: impl Display, color: bool) -> String {
    let icon = status_icon(status);
    if !color {
        return format!("{} {}", icon, msg);
    }
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: impl Display) {
    eprintln!("{}", format_status(status, msg, std::io::stderr().is_terminal()));
}

/// Print a section header to stdout.
pub fn print_section(title: &str, color: bool) {
    let header = format!("━━━ {} ━━━", title);
    if color {
        println!("{}", header.bold().cyan());
    } else {
        println!("{}", header);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_status() {
        assert_eq!(format_status(Status::Success, "done", false), "✓ done");
        assert_eq!(format_status(Status::Error, "failed", false), "✗ failed");
    }

    #[test]
    fn test_colored_status_keeps_message() {
        let line = format_status(Status::Error, "failed", true);
        assert!(line.contains("failed"));
        assert!(line.contains('✗'));
        assert_ne!(line, format_status(Status::Error, "failed", false));
    }
}
