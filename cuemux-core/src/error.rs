// ============================================================================
// cuemux-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the cuemux Core Library
//
// Every failure in the library is terminal for the run: nothing is retried.
// Cue sheet problems carry the offending track ordinals so the user can find
// the broken line, and ffmpeg/ffprobe failures keep the tool's own
// diagnostic text instead of reinterpreting it.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error type for the cuemux-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Cue sheet errors ----
    #[error("Cue sheet contains no TRACK entries")]
    EmptyCueSheet,

    #[error("Track {0} has no INDEX 01 timestamp")]
    MissingTimestamp(u32),

    #[error("Track {1} starts before track {0}")]
    OutOfOrderTimestamp(u32, u32),

    #[error("Track {0} has a malformed INDEX 01 timestamp: '{1}'")]
    MalformedIndexFormat(u32, String),

    #[error("Invalid TRACK number: '{0}'")]
    InvalidTrackNumber(String),

    #[error("Unsupported cue sheet encoding: {0}")]
    CueEncoding(String),

    // ---- Metadata errors ----
    #[error("Failed to parse ffmetadata: {0}")]
    MetadataParse(String),

    // ---- External tool errors ----
    #[error("Required external command '{0}' not found or failed to execute")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed while waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{0}' failed with status {1}{}", format_stderr(.2))]
    CommandFailed(String, ExitStatus, String),

    #[error("ffprobe output parsing error: {0}")]
    FfprobeParse(String),

    // ---- Path and configuration errors ----
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Unsupported output format '{0}': expected .mp4, .m4a or .m4b")]
    UnsupportedOutputFormat(String),

    #[error("Output file already exists: {} (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    OperationFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

/// Result type alias used throughout the library.
pub type CoreResult<T> = Result<T, CoreError>;

// ---- Helper constructors ----

pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}
