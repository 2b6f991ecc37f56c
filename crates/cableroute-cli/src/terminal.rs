//! Terminal styling and color utilities.
//!
//! This module provides ANSI escape code definitions and color detection
//! for the status summary the CLI prints to stderr.

use cableroute_lib::RouteStatus;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for emphasis (cable references, counts).
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for confirmed routes.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for virtual routes.
    pub const YELLOW: &str = "\x1b[33m";
    /// Orange (256-color) for incomplete routes.
    pub const ORANGE: &str = "\x1b[38;5;208m";
    /// Red for failures.
    pub const RED: &str = "\x1b[31m";
}

/// A collection of resolved color codes, either actual ANSI sequences
/// or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            orange: colors::ORANGE,
            red: colors::RED,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            yellow: "",
            orange: "",
            red: "",
        }
    }

    /// Create a palette based on terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Color used for a route status.
    pub fn status(&self, status: RouteStatus) -> &'static str {
        match status {
            RouteStatus::Confirmed => self.green,
            RouteStatus::Unconfirmed => self.yellow,
            RouteStatus::Incomplete => self.orange,
            RouteStatus::NoContainment => self.gray,
            RouteStatus::VirtualPathError | RouteStatus::ProcessingError => self.red,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// This function respects:
/// - The `NO_COLOR` environment variable (https://no-color.org/)
/// - The `TERM=dumb` convention for non-capable terminals
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}
