//! Command implementations for the CLI.

/// Module containing the implementation of the conversion.
/// Reads the cue sheet, writes chapter metadata and runs ffmpeg.
pub mod convert;
