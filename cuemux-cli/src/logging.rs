// ============================================================================
// cuemux-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger configuration for the cuemux binary
//
// All output, including the terminal status lines from cuemux-core, goes
// through the `log` facade to stderr. Info lines are printed as-is; other
// levels get a colored tag. stdout is left for --dry-run metadata.
//
// USAGE:
// - default: info
// - --verbose: debug
// - RUST_LOG overrides both (e.g. RUST_LOG=cuemux_core=trace)

use env_logger::Builder;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use std::io::Write;

/// Returns the log level used when RUST_LOG is not set.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn level_tag(level: Level, color: bool) -> String {
    let tag = format!("[{level}]");
    if !color {
        return tag;
    }
    match level {
        Level::Error => tag.red().bold().to_string(),
        Level::Warn => tag.yellow().bold().to_string(),
        Level::Info => tag.green().to_string(),
        Level::Debug => tag.blue().to_string(),
        Level::Trace => tag.dimmed().to_string(),
    }
}

/// Initializes the global logger. Safe to call more than once.
pub fn init(verbose: bool) {
    let color = std::env::var_os("NO_COLOR").is_none();

    let mut builder = Builder::new();
    builder
        .filter_level(default_level(verbose))
        .format(move |buf, record| {
            if record.level() == Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{} {}", level_tag(record.level(), color), record.args())
            }
        })
        .parse_default_env();

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false), LevelFilter::Info);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }

    #[test]
    fn test_plain_level_tag() {
        assert_eq!(level_tag(Level::Warn, false), "[WARN]");
        assert_eq!(level_tag(Level::Error, false), "[ERROR]");
    }
}
