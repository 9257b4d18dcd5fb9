//! # Terminal Palette
//!
//! ANSI escape codes used by the help, summary and failure renderers. A
//! monochrome palette yields empty strings for every code so renderers can
//! interpolate unconditionally.

const RESET: &str = "\u{1b}[0m";
const BOLD: &str = "\u{1b}[1m";
const DIM: &str = "\u{1b}[2m";
const UNDERLINED: &str = "\u{1b}[4m";
const RED: &str = "\u{1b}[0;31m";
const GREEN: &str = "\u{1b}[0;32m";
const YELLOW: &str = "\u{1b}[0;33m";
const BLUE: &str = "\u{1b}[0;34m";
const CYAN: &str = "\u{1b}[0;36m";

/// Rendering configuration: which escape codes to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    monochrome: bool,
}

impl Palette {
    /// Create a palette; `monochrome = true` disables every code.
    pub const fn new(monochrome: bool) -> Self {
        Self { monochrome }
    }

    /// True when no escape codes are emitted.
    pub const fn is_monochrome(&self) -> bool {
        self.monochrome
    }

    const fn code(&self, code: &'static str) -> &'static str {
        if self.monochrome {
            ""
        } else {
            code
        }
    }

    /// Reset all attributes.
    pub const fn reset(&self) -> &'static str {
        self.code(RESET)
    }

    /// Bold text.
    pub const fn bold(&self) -> &'static str {
        self.code(BOLD)
    }

    /// Dimmed text.
    pub const fn dim(&self) -> &'static str {
        self.code(DIM)
    }

    /// Underlined text.
    pub const fn underlined(&self) -> &'static str {
        self.code(UNDERLINED)
    }

    /// Red foreground.
    pub const fn red(&self) -> &'static str {
        self.code(RED)
    }

    /// Green foreground.
    pub const fn green(&self) -> &'static str {
        self.code(GREEN)
    }

    /// Yellow foreground.
    pub const fn yellow(&self) -> &'static str {
        self.code(YELLOW)
    }

    /// Blue foreground.
    pub const fn blue(&self) -> &'static str {
        self.code(BLUE)
    }

    /// Cyan foreground.
    pub const fn cyan(&self) -> &'static str {
        self.code(CYAN)
    }
}
