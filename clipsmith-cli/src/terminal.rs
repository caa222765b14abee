// ============================================================================
// clipsmith-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Every user-facing line goes through the `log` macros with the UI target, so
// the logger decides where it lands (console, log file or both).
//
// KEY COMPONENTS:
// - styling: Symbols and layout constants
// - print_* functions: section headers, steps, status lines, outcomes
// - print_level: maps core OutputLevel values onto the print functions

use clipsmith_core::progress_reporting::OutputLevel;
use console::style;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

/// Log target for lines meant for the user rather than for debugging.
pub const UI_TARGET: &str = "clipsmith::ui";

pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const PROCESSING_SYMBOL: &str = "»";
    pub const WARNING_SYMBOL: &str = "⚠";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const STATUS_INDENT: &str = "      ";
    pub const STATUS_LABEL_WIDTH: usize = 15;
}

static USE_COLOR: Lazy<bool> = Lazy::new(|| {
    std::env::var_os("NO_COLOR").is_none()
        && supports_color::on(supports_color::Stream::Stdout).is_some()
});

/// Check if color should be used (respects NO_COLOR and non-terminal stdout)
pub fn should_use_color() -> bool {
    *USE_COLOR
}

/// Label followed by enough spaces to line values up in one column.
fn padded_label(label: &str) -> String {
    let width = UnicodeWidthStr::width(label);
    let padding = styling::STATUS_LABEL_WIDTH.saturating_sub(width).max(1);
    format!("{label}:{}", " ".repeat(padding))
}

/// Print a section header (cyan, upper-cased)
pub fn print_section(title: &str) {
    info!(target: UI_TARGET, "");
    if should_use_color() {
        info!(target: UI_TARGET, "===== {} =====", title.to_uppercase().cyan().bold());
    } else {
        info!(target: UI_TARGET, "===== {} =====", title.to_uppercase());
    }
    info!(target: UI_TARGET, "");
}

/// Print a processing step
pub fn print_processing(message: &str) {
    if should_use_color() {
        info!(target: UI_TARGET, "  {} {}", styling::PROCESSING_SYMBOL, style(message).bold());
    } else {
        info!(target: UI_TARGET, "  {} {}", styling::PROCESSING_SYMBOL, message);
    }
}

/// Print a `label: value` line
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label = padded_label(label);
    if should_use_color() && highlight {
        info!(target: UI_TARGET, "{}{} {}", styling::STATUS_INDENT, label, style(value).bold());
    } else {
        info!(target: UI_TARGET, "{}{} {}", styling::STATUS_INDENT, label, value);
    }
}

pub fn print_success(message: &str) {
    info!(target: UI_TARGET, "");
    if should_use_color() {
        info!(target: UI_TARGET, "  {} {}", styling::SUCCESS_SYMBOL.green().bold(), message.green());
    } else {
        info!(target: UI_TARGET, "  {} {}", styling::SUCCESS_SYMBOL, message);
    }
}

pub fn print_warning(message: &str) {
    if should_use_color() {
        warn!(target: UI_TARGET, "  {} {}", styling::WARNING_SYMBOL.yellow().bold(), message.yellow());
    } else {
        warn!(target: UI_TARGET, "  {} {}", styling::WARNING_SYMBOL, message);
    }
}

/// Print an error block: a bold title line and the message beneath it
pub fn print_error(title: &str, message: &str) {
    error!(target: UI_TARGET, "");
    if should_use_color() {
        error!(target: UI_TARGET, "  {} {}", styling::ERROR_SYMBOL.red().bold(), title.red().bold());
    } else {
        error!(target: UI_TARGET, "  {} {}", styling::ERROR_SYMBOL, title);
    }
    for line in message.lines() {
        error!(target: UI_TARGET, "    {line}");
    }
}

/// Print a message reported by the core library at its level
pub fn print_level(level: OutputLevel, text: &str) {
    match level {
        OutputLevel::Section => print_section(text),
        OutputLevel::Processing => print_processing(text),
        OutputLevel::Success => print_success(text),
        OutputLevel::Warning => print_warning(text),
        OutputLevel::Error => print_error("Error", text),
    }
}
