// ============================================================================
// cuemux-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structure and Defaults
//
// CoreConfig carries everything one conversion needs: the three input/output
// paths, the optional cover, the external binaries and the ffmpeg options.
// It is built by the CLI from command-line arguments and validated before
// any file is touched.
//
// KEY COMPONENTS:
// - CoreConfig: Settings for a single audio + cue sheet conversion
// - Default constants for codec, loglevel and binary names

use crate::discovery::validate_output_container;
use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Default audio codec; the source stream is copied without re-encoding.
pub const DEFAULT_AUDIO_CODEC: &str = "copy";

/// Default ffmpeg `-loglevel`.
pub const DEFAULT_FFMPEG_LOGLEVEL: &str = "warning";

/// Default ffmpeg binary, looked up on PATH.
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Default ffprobe binary, looked up on PATH.
pub const DEFAULT_FFPROBE_BINARY: &str = "ffprobe";

/// Level names ffmpeg accepts for `-loglevel`.
pub const FFMPEG_LOGLEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Settings for one conversion.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Source audio file
    pub audio_path: PathBuf,

    /// Cue sheet describing the chapters
    pub cue_path: PathBuf,

    /// Output file (.mp4, .m4a or .m4b)
    pub output_path: PathBuf,

    /// Explicit cover image; must exist when given
    pub cover_path: Option<PathBuf>,

    /// Look for cover.jpg and friends next to the audio when no cover is given
    pub auto_cover: bool,

    /// Write the metadata file here and keep it, instead of a temp file
    pub metadata_path: Option<PathBuf>,

    /// Force a cue sheet encoding label (e.g. "windows-1251")
    pub cue_encoding: Option<String>,

    pub ffmpeg_binary: PathBuf,
    pub ffprobe_binary: PathBuf,

    /// Value passed to `-c:a`
    pub audio_codec: String,

    /// Value passed to `-loglevel`
    pub ffmpeg_loglevel: String,

    /// Replace an existing output file
    pub overwrite: bool,
}

impl CoreConfig {
    /// Creates a configuration with default options for the given paths.
    pub fn new(audio_path: PathBuf, cue_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            audio_path,
            cue_path,
            output_path,
            cover_path: None,
            auto_cover: true,
            metadata_path: None,
            cue_encoding: None,
            ffmpeg_binary: PathBuf::from(DEFAULT_FFMPEG_BINARY),
            ffprobe_binary: PathBuf::from(DEFAULT_FFPROBE_BINARY),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            ffmpeg_loglevel: DEFAULT_FFMPEG_LOGLEVEL.to_string(),
            overwrite: false,
        }
    }

    /// Checks option values that can be verified without touching the disk.
    pub fn validate(&self) -> CoreResult<()> {
        if self.audio_codec.trim().is_empty() {
            return Err(CoreError::Config("audio codec must not be empty".to_string()));
        }
        if !is_valid_loglevel(&self.ffmpeg_loglevel) {
            return Err(CoreError::Config(format!(
                "unknown ffmpeg loglevel '{}' (expected one of: {})",
                self.ffmpeg_loglevel,
                FFMPEG_LOGLEVELS.join(", ")
            )));
        }
        validate_output_container(&self.output_path)
    }
}

/// Accepts a level name or number, optionally preceded by ffmpeg's
/// `flag+` prefixes (e.g. `level+repeat+info`).
fn is_valid_loglevel(value: &str) -> bool {
    let level = value.rsplit('+').next().unwrap_or_default().trim();
    let flags_ok = value
        .split('+')
        .rev()
        .skip(1)
        .all(|flag| matches!(flag, "" | "level" | "repeat" | "time" | "datetime"));

    flags_ok && (FFMPEG_LOGLEVELS.contains(&level) || level.parse::<i32>().is_ok())
}
