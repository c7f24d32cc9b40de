//! Terminal UI components and styling for cuemux.
//!
//! Output goes through the `log` facade at info level so that it shares the
//! same destination and filtering as the rest of the program. Colors are
//! disabled when `NO_COLOR` is set.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

const LABEL_WIDTH: usize = 15;
const STATUS_INDENT: &str = "      ";

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", title.to_uppercase().cyan());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Print a processing step
pub fn print_processing(message: &str) {
    if should_use_color() {
        info!("  » {}", style(message).bold());
    } else {
        info!("  » {message}");
    }
}

/// Formats a `label: value` line with the value column aligned.
fn format_status_line(label: &str, value: &str) -> String {
    let padding = LABEL_WIDTH.saturating_sub(label.width()).max(1);
    format!("{STATUS_INDENT}{label}:{} {value}", " ".repeat(padding))
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    if should_use_color() && highlight {
        info!("{}", format_status_line(label, &value.bold().to_string()));
    } else {
        info!("{}", format_status_line(label, value));
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    info!("");
    if should_use_color() {
        info!("  ✓ {}", message.green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print an error with an optional suggestion
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        error!("✗ {}", title.red().bold());
    } else {
        error!("✗ {title}");
    }
    for line in message.lines() {
        error!("  {line}");
    }
    if let Some(hint) = suggestion {
        error!("  Suggestion: {hint}");
    }
}

/// Creates the progress bar shown while ffmpeg runs.
///
/// With a known duration the bar tracks seconds processed; otherwise a
/// spinner is shown. indicatif hides it when stderr is not a terminal.
pub fn create_progress_bar(total_secs: Option<f64>) -> ProgressBar {
    match total_secs.filter(|secs| *secs > 0.0) {
        Some(total) => {
            let bar = ProgressBar::new(total.ceil() as u64);
            if let Ok(bar_style) = ProgressStyle::with_template(
                "  {spinner:.green} Muxing [{bar:30.cyan/blue}] {percent:>3}% {msg}",
            ) {
                bar.set_style(bar_style.progress_chars("█▓░"));
            }
            bar
        }
        None => {
            let spinner = ProgressBar::new_spinner();
            if let Ok(spinner_style) = ProgressStyle::with_template("  {spinner:.green} Muxing {msg}") {
                spinner.set_style(spinner_style);
            }
            spinner
        }
    }
}
