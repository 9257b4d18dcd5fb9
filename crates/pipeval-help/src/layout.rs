//! Column arithmetic and word wrapping shared by the help and summary
//! renderers.
//!
//! Widths are counted in characters of visible text; escape codes never
//! count towards a line.

use pipeval_core::{Palette, DEFAULT_TERMINAL_WIDTH};

/// Columns before the name: two spaces and the `--` prefix.
const NAME_PREFIX_WIDTH: usize = 4;

/// Minimum width of the padded `[type]` cell.
pub const MIN_TYPE_CELL_WIDTH: usize = 10;

/// Dashed rule closing help and summary output.
pub fn dashed_line(palette: &Palette) -> String {
    format!(
        "-{}----------------------------------------------------{}-",
        palette.dim(),
        palette.reset()
    )
}

/// Column positions for one help rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpLayout {
    /// Width of the `--name` column: widest name plus one.
    pub max_chars: usize,
    /// Width of the padded `[type]` cell, separator included.
    pub type_width: usize,
    /// Column at which descriptions start.
    pub desc_indent: usize,
    /// Visible characters available for a description line.
    pub line_width: usize,
    terminal_width: usize,
}

impl HelpLayout {
    /// Layout for names up to `max_name_width` on a terminal of
    /// `terminal_width` columns.
    pub fn new(max_name_width: usize, terminal_width: usize) -> Self {
        Self::with_columns(max_name_width + 1, MIN_TYPE_CELL_WIDTH, terminal_width)
    }

    /// Widen the type column so a cell of `widest_type_cell` characters is
    /// still followed by a space.
    pub fn with_type_cell(self, widest_type_cell: usize) -> Self {
        let type_width = MIN_TYPE_CELL_WIDTH.max(widest_type_cell + 1);
        Self::with_columns(self.max_chars, type_width, self.terminal_width)
    }

    fn with_columns(max_chars: usize, type_width: usize, terminal_width: usize) -> Self {
        let desc_indent = NAME_PREFIX_WIDTH + max_chars + type_width;
        Self {
            max_chars,
            type_width,
            desc_indent,
            line_width: terminal_width.saturating_sub(desc_indent),
            terminal_width,
        }
    }
}

impl Default for HelpLayout {
    fn default() -> Self {
        Self::new(0, DEFAULT_TERMINAL_WIDTH)
    }
}

/// Pad `text` with spaces to at least `width` characters.
pub fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    /// Visible text.
    pub text: &'a str,
    /// Render dimmed.
    pub dim: bool,
}

impl<'a> Span<'a> {
    /// Plain text.
    pub fn plain(text: &'a str) -> Self {
        Self { text, dim: false }
    }

    /// Dimmed text.
    pub fn dim(text: &'a str) -> Self {
        Self { text, dim: true }
    }
}

/// Greedy word wrap over styled spans.
///
/// Words are split on spaces; runs of spaces collapse. A word joins the
/// current line while the line (counting one trailing space per word) plus
/// the word stays within `width`; a word longer than `width` gets a line of
/// its own. Dimmed runs are reopened on every line and closed before
/// each line break.
pub fn wrap_spans(spans: &[Span<'_>], width: usize, palette: &Palette) -> Vec<String> {
    let mut lines: Vec<Vec<Span<'_>>> = Vec::new();
    let mut current: Vec<Span<'_>> = Vec::new();
    let mut used = 0usize;

    for span in spans {
        for word in span.text.split(' ').filter(|w| !w.is_empty()) {
            let len = word.chars().count();
            if used + len > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(Span {
                text: word,
                dim: span.dim,
            });
            used += len + 1;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
        .iter()
        .map(|words| render_line(words, palette))
        .collect()
}

fn render_line(words: &[Span<'_>], palette: &Palette) -> String {
    let mut out = String::new();
    let mut dimmed = false;
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if word.dim != dimmed {
            out.push_str(if word.dim { palette.dim() } else { palette.reset() });
            dimmed = word.dim;
        }
        out.push_str(word.text);
    }
    if dimmed {
        out.push_str(palette.reset());
    }
    out
}

/// Wrap plain text at `width`, joining lines with a newline plus `indent`
/// spaces. Text that already fits is returned unchanged.
pub fn wrap_text(text: &str, width: usize, indent: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let palette = Palette::new(true);
    wrap_spans(&[Span::plain(text)], width, &palette).join(&format!("\n{}", " ".repeat(indent)))
}

/// Join enum values for the `(accepted: …)` suffix, cut to fit `budget`
/// visible characters.
///
/// When the full list is too long it is cut back to whole entries and ends
/// with `, ...`; the result never exceeds `budget`. A first entry that alone
/// does not fit leaves just `...`, shortened further when `budget` is below
/// three.
pub fn accepted_values(values: &[String], budget: usize) -> String {
    let joined = values.join(", ");
    if joined.chars().count() <= budget {
        return joined;
    }
    let keep = budget.saturating_sub(5);
    let cut: String = joined.chars().take(keep).collect();
    match cut.rfind(',') {
        Some(idx) => format!("{}, ...", &cut[..idx]),
        None => ".".repeat(budget.min(3)),
    }
}
