//! Color palette and styling for CLI output.
//!
//! Every `fmt_*` helper returns plain text when color is disabled, so command
//! output stays identical apart from escape codes.

use owo_colors::{OwoColorize, Style};

/// Style for `type/id` references, the primary identifier.
pub fn tool_ref() -> Style {
    Style::new().cyan().bold()
}

/// Style for section headings like "Prompts:".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for labels like "Version:" or "Installed at:".
pub fn label() -> Style {
    Style::new().blue()
}

/// Style for description text.
pub fn description() -> Style {
    Style::new().dimmed()
}

/// Style for path values.
pub fn path() -> Style {
    Style::new().white()
}

/// Style for version numbers.
pub fn version() -> Style {
    Style::new().magenta()
}

/// Style for completed actions and passing checks.
pub fn success() -> Style {
    Style::new().green()
}

/// Style for warning text.
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Style for failed checks.
pub fn error() -> Style {
    Style::new().red()
}

/// Apply a style when color is enabled.
fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a `type/id` reference.
pub fn fmt_tool_ref(text: &str, use_color: bool) -> String {
    paint(text, tool_ref(), use_color)
}

/// Format a section heading.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    paint(text, heading(), use_color)
}

/// Format a label.
pub fn fmt_label(text: &str, use_color: bool) -> String {
    paint(text, label(), use_color)
}

/// Format description text.
pub fn fmt_description(text: &str, use_color: bool) -> String {
    paint(text, description(), use_color)
}

/// Format a path.
pub fn fmt_path(text: &str, use_color: bool) -> String {
    paint(text, path(), use_color)
}

/// Format a version number.
pub fn fmt_version(text: &str, use_color: bool) -> String {
    paint(text, version(), use_color)
}

/// Format a success message.
pub fn fmt_success(text: &str, use_color: bool) -> String {
    paint(text, success(), use_color)
}

/// Format warning text.
pub fn fmt_warning(text: &str, use_color: bool) -> String {
    paint(text, warning(), use_color)
}

/// Format an error message.
pub fn fmt_error(text: &str, use_color: bool) -> String {
    paint(text, error(), use_color)
}
