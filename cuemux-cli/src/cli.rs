// cuemux-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use cuemux_core::config::{
    DEFAULT_AUDIO_CODEC, DEFAULT_FFMPEG_BINARY, DEFAULT_FFMPEG_LOGLEVEL, DEFAULT_FFPROBE_BINARY,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "cuemux",
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "cuemux: Embed cue sheet chapters into an MP4 audiobook",
    long_about = "Reads a cue sheet, turns its tracks into chapters and uses ffmpeg to \
                  mux the audio, the chapters and an optional cover into one .mp4/.m4a/.m4b file."
)]
pub struct Cli {
    /// Source audio file
    #[arg(value_name = "AUDIO_FILE")]
    pub audio_file: PathBuf,

    /// Cue sheet describing the chapters
    #[arg(value_name = "CUE_FILE")]
    pub cue_file: PathBuf,

    /// Output file (.mp4, .m4a or .m4b)
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: PathBuf,

    /// Cover image to embed (defaults to cover.jpg, folder.jpg, ... next to the audio)
    #[arg(short = 'c', long = "cover", value_name = "IMAGE")]
    pub cover: Option<PathBuf>,

    /// Do not look for a cover image next to the audio file
    #[arg(long)]
    pub no_auto_cover: bool,

    /// ffmpeg binary to use
    #[arg(long, value_name = "PATH", env = "CUEMUX_FFMPEG", default_value = DEFAULT_FFMPEG_BINARY)]
    pub ffmpeg: PathBuf,

    /// ffprobe binary to use
    #[arg(long, value_name = "PATH", env = "CUEMUX_FFPROBE", default_value = DEFAULT_FFPROBE_BINARY)]
    pub ffprobe: PathBuf,

    /// Audio codec passed to ffmpeg's -c:a ("copy" keeps the source stream)
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_AUDIO_CODEC)]
    pub audio_codec: String,

    /// ffmpeg -loglevel value (quiet, error, warning, info, verbose, debug, ...)
    #[arg(short = 'v', long = "ffmpeg-loglevel", value_name = "LEVEL", default_value = DEFAULT_FFMPEG_LOGLEVEL)]
    pub ffmpeg_loglevel: String,

    /// Overwrite the output file if it exists
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Write the generated ffmetadata to PATH and keep it
    #[arg(long, value_name = "PATH")]
    pub metadata_file: Option<PathBuf>,

    /// Cue sheet text encoding (e.g. windows-1251); detected when omitted
    #[arg(long, value_name = "LABEL")]
    pub cue_encoding: Option<String>,

    /// Print the generated ffmetadata to stdout instead of running ffmpeg
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}
