// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Failed results: soft red
    pub const FAILURE: u8 = 167;
    /// Passing results: sage green
    pub const SUCCESS: u8 = 108;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    let fg = |code| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    Styles::styled()
        .header(fg(codes::HEADER))
        .literal(fg(codes::LITERAL))
        .placeholder(fg(codes::CONTEXT))
}

fn paint(code: u8, text: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[38;5;{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text, should_colorize())
}

/// Color a build result by outcome; anything but SUCCESS reads as a failure.
pub fn result(text: &str) -> String {
    let code = if text == "SUCCESS" { codes::SUCCESS } else { codes::FAILURE };
    paint(code, text, should_colorize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_wraps_in_ansi_when_enabled() {
        assert_eq!(paint(codes::HEADER, "acme", true), "\x1b[38;5;74macme\x1b[0m");
    }

    #[test]
    fn paint_is_plain_when_disabled() {
        assert_eq!(paint(codes::FAILURE, "FAILURE", false), "FAILURE");
    }
}
