// ============================================================================
// cuemux-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type and only adds a way to attach context
// to lower-level failures, plus hints shown next to common errors.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: context extension for Result
// - suggestion_for: user-facing hints for common failures

use cuemux_core::{CoreError, CoreResult};
use std::fmt;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{context}: {core_error}"))
        })
    }
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

/// Returns a hint for errors the user can usually fix from the command line.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => {
            Some("Install ffmpeg/ffprobe or point --ffmpeg/--ffprobe at them")
        }
        CoreError::OutputExists(_) => Some("Pass --force to replace the existing file"),
        CoreError::UnsupportedOutputFormat(_) => {
            Some("Use an output file name ending in .m4b, .m4a or .mp4")
        }
        CoreError::CueEncoding(_) => {
            Some("Use a WHATWG encoding label such as utf-8 or windows-1251")
        }
        CoreError::MalformedIndexFormat(..)
        | CoreError::MissingTimestamp(_)
        | CoreError::OutOfOrderTimestamp(..)
        | CoreError::EmptyCueSheet => Some("Check the TRACK and INDEX 01 lines of the cue sheet"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_result_context() {
        let result: Result<(), io::Error> = Err(io::Error::other("disk full"));
        let err = result.cli_context("Failed to write metadata").unwrap_err();
        assert_eq!(err.to_string(), "Failed to write metadata: I/O error: disk full");
    }

    #[test]
    fn test_suggestions() {
        assert!(suggestion_for(&CoreError::EmptyCueSheet).is_some());
        assert!(suggestion_for(&CoreError::Config("x".into())).is_none());
    }
}
